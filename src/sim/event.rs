/// Events emitted by the session while it runs.
/// The presentation layer consumes these for sound; the session logs them.

use crate::domain::rules::CollisionKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    FoodEaten { x: i32, y: i32, score: u32 },
    /// New food landed on a body cell (single-draw placement).
    FoodOnSnake { x: i32, y: i32 },
    Crashed { kind: CollisionKind, score: u32 },
    NewHighScore { score: u32 },
}
