/// Entities: Cell, Direction and the Snake body.
/// The snake is stored head-first; all mutation goes through
/// `push_head()` / `pop_tail()` so the non-empty invariant holds.

use std::collections::VecDeque;

/// One grid position. Signed so a candidate head may step off the board
/// before the collision check rejects it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The neighbouring cell one unit step in `dir`.
    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

/// Travel direction. Screen coordinates: y grows downward.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// A length-1 snake sitting on `origin`.
    pub fn new(origin: Cell) -> Self {
        let mut body = VecDeque::with_capacity(64);
        body.push_back(origin);
        Snake { body }
    }

    /// Build from head-first cells. Returns None for an empty slice.
    #[cfg(test)]
    pub fn from_cells(cells: &[Cell]) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        Some(Snake { body: cells.iter().copied().collect() })
    }

    pub fn head(&self) -> Cell {
        // Non-empty by construction
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Head-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    #[cfg(test)]
    pub fn cells(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    /// Drop the tail cell. A length-1 snake keeps its only cell.
    pub fn pop_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_one_unit() {
        let c = Cell::new(10, 10);
        assert_eq!(c.step(Direction::Up), Cell::new(10, 9));
        assert_eq!(c.step(Direction::Down), Cell::new(10, 11));
        assert_eq!(c.step(Direction::Left), Cell::new(9, 10));
        assert_eq!(c.step(Direction::Right), Cell::new(11, 10));
    }

    #[test]
    fn step_can_leave_the_board() {
        assert_eq!(Cell::new(0, 5).step(Direction::Left), Cell::new(-1, 5));
    }

    #[test]
    fn opposites_pair_up() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Right.is_opposite(Direction::Right));
    }

    #[test]
    fn grow_then_shrink() {
        let mut s = Snake::new(Cell::new(10, 10));
        s.push_head(Cell::new(11, 10));
        assert_eq!(s.len(), 2);
        assert_eq!(s.head(), Cell::new(11, 10));
        assert_eq!(s.cells(), vec![Cell::new(11, 10), Cell::new(10, 10)]);

        assert_eq!(s.pop_tail(), Some(Cell::new(10, 10)));
        assert_eq!(s.cells(), vec![Cell::new(11, 10)]);
    }

    #[test]
    fn never_empties() {
        let mut s = Snake::new(Cell::new(3, 3));
        assert_eq!(s.pop_tail(), None);
        assert_eq!(s.len(), 1);
        assert!(Snake::from_cells(&[]).is_none());
    }
}
