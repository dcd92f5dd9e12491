/// Food placement with an injected, seedable random source.
///
/// `SingleDraw` makes one uniform draw per placement and ignores
/// occupancy, so food can land on the snake. `AvoidSnake` redraws until
/// the cell is free.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::entity::{Cell, Snake};
use super::grid::Grid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FoodPolicy {
    SingleDraw,
    AvoidSnake,
}

impl FoodPolicy {
    pub fn from_name(s: &str) -> Option<FoodPolicy> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "single_draw" | "single" => Some(FoodPolicy::SingleDraw),
            "avoid_snake" | "avoid" => Some(FoodPolicy::AvoidSnake),
            _ => None,
        }
    }
}

pub struct FoodPlacer {
    rng: StdRng,
    seed: u64,
    policy: FoodPolicy,
}

impl FoodPlacer {
    pub fn new(seed: u64, policy: FoodPolicy) -> Self {
        FoodPlacer {
            rng: StdRng::seed_from_u64(seed),
            seed,
            policy,
        }
    }

    pub fn from_random(policy: FoodPolicy) -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed, policy)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn policy(&self) -> FoodPolicy {
        self.policy
    }

    /// Pick the next food cell on `grid`.
    pub fn place(&mut self, grid: &Grid, occupied: &Snake) -> Cell {
        match self.policy {
            FoodPolicy::SingleDraw => self.draw(grid),
            FoodPolicy::AvoidSnake => self.draw_free(grid, occupied),
        }
    }

    fn draw(&mut self, grid: &Grid) -> Cell {
        let x = self.rng.random_range(0..grid.width.max(1));
        let y = self.rng.random_range(0..grid.height.max(1));
        Cell::new(x, y)
    }

    fn draw_free(&mut self, grid: &Grid, occupied: &Snake) -> Cell {
        // Rejection sampling is cheap while the board is mostly empty.
        for _ in 0..grid.area().max(1) {
            let cell = self.draw(grid);
            if !occupied.contains(cell) {
                return cell;
            }
        }

        // Crowded board: pick uniformly among the cells that are left.
        let free: Vec<Cell> = (0..grid.height)
            .flat_map(|y| (0..grid.width).map(move |x| Cell::new(x, y)))
            .filter(|c| !occupied.contains(*c))
            .collect();
        if free.is_empty() {
            // Snake fills the board; nothing better exists.
            return self.draw(grid);
        }
        free[self.rng.random_range(0..free.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board_but(grid: &Grid, hole: Cell) -> Snake {
        let cells: Vec<Cell> = (0..grid.height)
            .flat_map(|y| (0..grid.width).map(move |x| Cell::new(x, y)))
            .filter(|&c| c != hole)
            .collect();
        Snake::from_cells(&cells).unwrap()
    }

    #[test]
    fn same_seed_same_sequence() {
        let grid = Grid::default();
        let snake = Snake::new(Cell::new(10, 10));
        let mut a = FoodPlacer::new(42, FoodPolicy::SingleDraw);
        let mut b = FoodPlacer::new(42, FoodPolicy::SingleDraw);
        for _ in 0..50 {
            assert_eq!(a.place(&grid, &snake), b.place(&grid, &snake));
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn placements_stay_on_the_board() {
        let grid = Grid::new(7, 3);
        let snake = Snake::new(Cell::new(0, 0));
        let mut p = FoodPlacer::new(7, FoodPolicy::SingleDraw);
        for _ in 0..500 {
            assert!(grid.is_in_bounds(p.place(&grid, &snake)));
        }
    }

    #[test]
    fn single_draw_may_land_on_the_snake() {
        // Known gap kept for parity: a 1×1 board only has the snake's cell.
        let grid = Grid::new(1, 1);
        let snake = Snake::new(Cell::new(0, 0));
        let mut p = FoodPlacer::new(1, FoodPolicy::SingleDraw);
        assert_eq!(p.place(&grid, &snake), Cell::new(0, 0));
    }

    #[test]
    fn avoid_snake_finds_the_last_free_cell() {
        let grid = Grid::new(5, 5);
        let hole = Cell::new(3, 1);
        let snake = full_board_but(&grid, hole);
        for seed in 0..20 {
            let mut p = FoodPlacer::new(seed, FoodPolicy::AvoidSnake);
            assert_eq!(p.place(&grid, &snake), hole);
        }
    }

    #[test]
    fn avoid_snake_never_overlaps() {
        let grid = Grid::new(6, 6);
        let cells: Vec<Cell> = (0..6).map(|x| Cell::new(x, 2)).collect();
        let snake = Snake::from_cells(&cells).unwrap();
        let mut p = FoodPlacer::new(99, FoodPolicy::AvoidSnake);
        for _ in 0..200 {
            assert!(!snake.contains(p.place(&grid, &snake)));
        }
    }

    #[test]
    fn policy_names() {
        assert_eq!(FoodPolicy::from_name("single_draw"), Some(FoodPolicy::SingleDraw));
        assert_eq!(FoodPolicy::from_name("Avoid-Snake"), Some(FoodPolicy::AvoidSnake));
        assert_eq!(FoodPolicy::from_name("retry"), None);
    }
}
