/// Collision rules. Pure functions: no world state, no side effects.
///
/// The candidate head is checked against the snake as it is *before* the
/// move is committed, so the current tail counts as occupied even though
/// it would be vacated by a plain move.

use super::entity::{Cell, Snake};
use super::grid::Grid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollisionKind {
    None,
    Wall,
    SelfCollision,
}

impl CollisionKind {
    pub fn is_fatal(self) -> bool {
        !matches!(self, CollisionKind::None)
    }
}

/// Classify a candidate head. Wall takes precedence over body.
pub fn detect(head: Cell, body: &Snake, grid: &Grid) -> CollisionKind {
    if !grid.is_in_bounds(head) {
        return CollisionKind::Wall;
    }
    if body.contains(head) {
        return CollisionKind::SelfCollision;
    }
    CollisionKind::None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        let cells: Vec<Cell> = cells.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        Snake::from_cells(&cells).unwrap()
    }

    const G: Grid = Grid::new(20, 20);

    #[test]
    fn open_cell_is_clear() {
        let s = snake(&[(5, 5), (6, 5), (7, 5)]);
        assert_eq!(detect(Cell::new(4, 5), &s, &G), CollisionKind::None);
    }

    #[test]
    fn every_edge_is_a_wall() {
        let s = snake(&[(10, 10)]);
        for head in [
            Cell::new(-1, 10),
            Cell::new(20, 10),
            Cell::new(10, -1),
            Cell::new(10, 20),
            Cell::new(-5, -5),
            Cell::new(100, 3),
        ] {
            assert_eq!(detect(head, &s, &G), CollisionKind::Wall, "{:?}", head);
        }
    }

    #[test]
    fn hitting_any_body_cell_is_self() {
        let s = snake(&[(5, 5), (5, 6), (6, 6), (6, 5)]);
        for &(x, y) in &[(5, 5), (5, 6), (6, 6)] {
            assert_eq!(detect(Cell::new(x, y), &s, &G), CollisionKind::SelfCollision);
        }
    }

    #[test]
    fn current_tail_still_counts() {
        // Head (5,5) moving Right into (6,5), which is the tail right now.
        let s = snake(&[(5, 5), (5, 6), (6, 6), (6, 5)]);
        assert_eq!(detect(Cell::new(6, 5), &s, &G), CollisionKind::SelfCollision);
    }

    #[test]
    fn wall_wins_over_body() {
        // Body cells are never out of bounds, but the ordering is still wall-first.
        let s = snake(&[(0, 0)]);
        assert_eq!(detect(Cell::new(-1, 0), &s, &G), CollisionKind::Wall);
        assert!(CollisionKind::Wall.is_fatal());
        assert!(!CollisionKind::None.is_fatal());
    }
}
