/// WorldState: everything the tick engine reads and writes.
///
/// The session owns exactly one of these. Input handlers mutate
/// `direction` / `is_paused` between ticks; `step()` only looks at them
/// at the start of a tick, so a tick never sees half an input.

use crate::domain::entity::{Cell, Direction, Snake};
use crate::domain::grid::Grid;
use crate::domain::rules::CollisionKind;

/// Default spawn cell of a fresh snake.
pub const START_CELL: Cell = Cell::new(10, 10);
pub const START_DIRECTION: Direction = Direction::Right;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldState {
    pub grid: Grid,
    /// Spawn cell used by `reset()`.
    pub origin: Cell,
    pub snake: Snake,
    pub food: Cell,
    pub direction: Direction,
    pub score: u32,
    pub is_over: bool,
    pub is_paused: bool,
    /// What ended the run, once `is_over` is set.
    pub crash: Option<CollisionKind>,
    /// Committed moves since the last reset.
    pub moves: u64,
}

impl WorldState {
    pub fn new(grid: Grid, origin: Cell, food: Cell) -> Self {
        WorldState {
            grid,
            origin,
            snake: Snake::new(origin),
            food,
            direction: START_DIRECTION,
            score: 0,
            is_over: false,
            is_paused: false,
            crash: None,
            moves: 0,
        }
    }

    /// Back to a length-1 snake on `origin`, heading Right, score 0.
    /// Food is chosen by the caller.
    pub fn reset(&mut self, food: Cell) {
        self.snake = Snake::new(self.origin);
        self.food = food;
        self.direction = START_DIRECTION;
        self.score = 0;
        self.is_over = false;
        self.is_paused = false;
        self.crash = None;
        self.moves = 0;
    }

    /// Does food currently overlap the body?
    pub fn food_on_snake(&self) -> bool {
        self.snake.contains(self.food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_world_matches_start_position() {
        let w = WorldState::new(Grid::default(), START_CELL, Cell::new(3, 4));
        assert_eq!(w.snake.cells(), vec![Cell::new(10, 10)]);
        assert_eq!(w.direction, Direction::Right);
        assert_eq!(w.score, 0);
        assert!(!w.is_over && !w.is_paused);
    }

    #[test]
    fn reset_clears_a_finished_run() {
        let mut w = WorldState::new(Grid::default(), START_CELL, Cell::new(3, 4));
        w.snake.push_head(Cell::new(11, 10));
        w.direction = Direction::Down;
        w.score = 70;
        w.is_over = true;
        w.is_paused = true;
        w.crash = Some(CollisionKind::Wall);
        w.moves = 12;

        w.reset(Cell::new(1, 1));
        assert_eq!(w.snake.cells(), vec![START_CELL]);
        assert_eq!(w.food, Cell::new(1, 1));
        assert_eq!(w.direction, Direction::Right);
        assert_eq!(w.score, 0);
        assert!(!w.is_over && !w.is_paused);
        assert_eq!(w.crash, None);
        assert_eq!(w.moves, 0);
    }
}
