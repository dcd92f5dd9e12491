/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Pause / finished check (no-op)
///   2. Candidate head from the current direction
///   3. Collision against the pre-move snake → game over, snake untouched
///   4. Prepend the head
///   5. Food → score, new food, keep tail (growth)
///   6. Otherwise drop the tail

use crate::domain::food::FoodPlacer;
use crate::domain::rules;
use super::world::WorldState;

/// Points per food eaten.
pub const FOOD_SCORE: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    Continuing,
    AteFood,
    GameOver,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, food: &mut FoodPlacer) -> TickOutcome {
    if world.is_over { return TickOutcome::GameOver; }
    if world.is_paused { return TickOutcome::Continuing; }

    let head = world.snake.head().step(world.direction);

    let hit = rules::detect(head, &world.snake, &world.grid);
    if hit.is_fatal() {
        world.is_over = true;
        world.crash = Some(hit);
        return TickOutcome::GameOver;
    }

    world.snake.push_head(head);
    world.moves += 1;

    if head == world.food {
        world.score += FOOD_SCORE;
        world.food = food.place(&world.grid, &world.snake);
        TickOutcome::AteFood
    } else {
        world.snake.pop_tail();
        TickOutcome::Continuing
    }
}
