/// GameSession: owns the world, the high score and the tick timer.
///
/// ## States
///
///   Idle ──Start──▶ Running ◀──TogglePause──▶ Paused
///                      │
///                  GameOver
///                      ▼
///                    Over ──Start──▶ Running
///
/// Input handlers mutate the world immediately. The tick engine only runs
/// from `poll()` / `tick()`, so it always sees a consistent direction and
/// pause flag. While paused the timer keeps firing and each tick is a
/// no-op; on game over the timer is cancelled.

use std::time::{Duration, Instant};

use crate::config::{GameConfig, SpeedConfig};
use crate::domain::entity::{Cell, Direction};
use crate::domain::food::FoodPlacer;
use crate::domain::grid::Grid;
use crate::domain::rules::CollisionKind;
use crate::log;
use super::event::GameEvent;
use super::save::HighScoreStore;
use super::scheduler::{TickScheduler, TimerHandle};
use super::step::{self, TickOutcome};
use super::world::WorldState;

const MESSAGE_TIME: Duration = Duration::from_millis(1500);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Over,
}

/// Discrete input commands, one handler each.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    TogglePause,
    Start,
    SetTickInterval(u64),
}

pub struct GameSession<S: HighScoreStore> {
    world: WorldState,
    started: bool,
    high_score: u32,
    tick_interval_ms: u64,
    speed: SpeedConfig,
    food: FoodPlacer,
    store: S,
    scheduler: TickScheduler,
    timer: Option<TimerHandle>,
    message: String,
    message_until: Option<Instant>,
}

// ── Construction ──

impl<S: HighScoreStore> GameSession<S> {
    pub fn new(config: &GameConfig, store: S) -> Self {
        let food = match config.food.seed {
            Some(seed) => FoodPlacer::new(seed, config.food.policy),
            None => FoodPlacer::from_random(config.food.policy),
        };
        Self::with_parts(config.board.grid, config.board.start, config.speed, food, store)
    }

    pub fn with_parts(
        grid: Grid,
        origin: Cell,
        speed: SpeedConfig,
        mut food: FoodPlacer,
        store: S,
    ) -> Self {
        let mut world = WorldState::new(grid, origin, origin);
        world.food = food.place(&world.grid, &world.snake);
        let high_score = store.load_high_score();
        log!(
            "session created: board {}x{}, high score {}, food {:?} seed {}",
            grid.width, grid.height, high_score, food.policy(), food.seed()
        );

        GameSession {
            world,
            started: false,
            high_score,
            tick_interval_ms: speed.clamp(speed.tick_interval_ms),
            speed,
            food,
            store,
            scheduler: TickScheduler::new(),
            timer: None,
            message: String::new(),
            message_until: None,
        }
    }
}

// ── Queries ──

impl<S: HighScoreStore> GameSession<S> {
    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::Idle
        } else if self.world.is_over {
            Phase::Over
        } else if self.world.is_paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn score(&self) -> u32 {
        self.world.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn speed(&self) -> &SpeedConfig {
        &self.speed
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_some_and(|h| self.scheduler.is_current(h))
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Transient status text, if it has not expired.
    pub fn message(&self, now: Instant) -> Option<&str> {
        match self.message_until {
            Some(until) if now < until && !self.message.is_empty() => Some(self.message.as_str()),
            _ => None,
        }
    }

    fn set_message(&mut self, msg: &str, now: Instant) {
        self.message = msg.to_string();
        self.message_until = Some(now + MESSAGE_TIME);
    }
}

// ── Commands ──

impl<S: HighScoreStore> GameSession<S> {
    /// Dispatch one input command.
    pub fn apply(&mut self, command: Command, now: Instant) -> Vec<GameEvent> {
        match command {
            Command::MoveUp => { self.turn(Direction::Up); }
            Command::MoveDown => { self.turn(Direction::Down); }
            Command::MoveLeft => { self.turn(Direction::Left); }
            Command::MoveRight => { self.turn(Direction::Right); }
            Command::TogglePause => { self.toggle_pause(); }
            Command::SetTickInterval(ms) => { self.set_tick_interval(ms, now); }
            Command::Start => return self.start(now),
        }
        vec![]
    }

    /// Fresh run: length-1 snake on the origin, heading Right, score 0,
    /// new food. Any previous timer is replaced.
    pub fn start(&mut self, now: Instant) -> Vec<GameEvent> {
        self.world.reset(self.world.origin);
        let food = self.food.place(&self.world.grid, &self.world.snake);
        self.world.food = food;
        self.started = true;
        self.message.clear();
        self.message_until = None;
        self.timer = Some(self.scheduler.start(now));
        log!("start: food at ({}, {}), interval {} ms", food.x, food.y, self.tick_interval_ms);
        vec![GameEvent::Started]
    }

    /// Running ↔ Paused. Ignored while Idle or Over.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase() {
            Phase::Running | Phase::Paused => {
                self.world.is_paused = !self.world.is_paused;
                true
            }
            Phase::Idle | Phase::Over => false,
        }
    }

    /// Change direction unless it reverses the current one.
    /// Returns whether the request was accepted.
    pub fn turn(&mut self, dir: Direction) -> bool {
        if self.world.is_over {
            return false;
        }
        if dir.is_opposite(self.world.direction) {
            return false;
        }
        self.world.direction = dir;
        true
    }

    /// New tick period, clamped to the configured bounds. The pending tick
    /// keeps its deadline; the one after it uses the new period.
    pub fn set_tick_interval(&mut self, ms: u64, now: Instant) -> u64 {
        let ms = self.speed.clamp(ms);
        if ms != self.tick_interval_ms {
            log!("tick interval {} -> {} ms", self.tick_interval_ms, ms);
            self.tick_interval_ms = ms;
        }
        self.set_message(&format!("Speed: {} ms", ms), now);
        ms
    }
}

// ── Ticking ──

impl<S: HighScoreStore> GameSession<S> {
    /// Run the tick engine if the timer is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<GameEvent> {
        if !self.is_ticking() {
            return vec![];
        }
        if !self.scheduler.poll(now, self.tick_interval()) {
            return vec![];
        }
        self.tick(now)
    }

    /// One tick of the engine plus its session-level consequences.
    pub fn tick(&mut self, now: Instant) -> Vec<GameEvent> {
        if self.phase() != Phase::Running && self.phase() != Phase::Paused {
            return vec![];
        }

        let outcome = step::step(&mut self.world, &mut self.food);

        let mut events = vec![];
        match outcome {
            TickOutcome::Continuing => {}
            TickOutcome::AteFood => {
                let head = self.world.snake.head();
                events.push(GameEvent::FoodEaten { x: head.x, y: head.y, score: self.world.score });
                if self.world.food_on_snake() {
                    let f = self.world.food;
                    log!("food placed on the snake at ({}, {})", f.x, f.y);
                    events.push(GameEvent::FoodOnSnake { x: f.x, y: f.y });
                }
            }
            TickOutcome::GameOver => {
                self.scheduler.cancel();
                self.timer = None;
                let kind = self.world.crash.unwrap_or(CollisionKind::Wall);
                log!(
                    "game over ({:?}) with score {} after {} moves",
                    kind, self.world.score, self.world.moves
                );
                events.push(GameEvent::Crashed { kind, score: self.world.score });
                if let Some(ev) = self.record_high_score(now) {
                    events.push(ev);
                }
            }
        }
        events
    }

    /// Only called on entering Over: raise and persist the high score.
    fn record_high_score(&mut self, now: Instant) -> Option<GameEvent> {
        let score = self.world.score;
        if score <= self.high_score {
            return None;
        }
        self.high_score = score;
        log!("new high score {}", score);
        if let Err(e) = self.store.save_high_score(score) {
            log!("high score not saved: {:#}", e);
            self.set_message("High score could not be saved", now);
        }
        Some(GameEvent::NewHighScore { score })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Snake;
    use crate::domain::food::FoodPolicy;
    use crate::sim::save::MemoryStore;

    fn session_with(store: MemoryStore) -> GameSession<MemoryStore> {
        GameSession::with_parts(
            Grid::new(20, 20),
            Cell::new(10, 10),
            SpeedConfig::default(),
            FoodPlacer::new(3, FoodPolicy::SingleDraw),
            store,
        )
    }

    fn session() -> GameSession<MemoryStore> {
        session_with(MemoryStore::default())
    }

    fn running() -> GameSession<MemoryStore> {
        let mut s = session();
        s.start(Instant::now());
        // Keep food out of the way unless a test places it.
        s.world.food = Cell::new(0, 19);
        s
    }

    #[test]
    fn new_session_is_idle_with_loaded_high_score() {
        let s = session_with(MemoryStore { value: 80, ..Default::default() });
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.high_score(), 80);
        assert_eq!(s.world().snake.cells(), vec![Cell::new(10, 10)]);
        assert_eq!(s.world().direction, Direction::Right);
        assert_eq!(s.tick_interval_ms(), 100);
        assert!(!s.is_ticking());
    }

    #[test]
    fn idle_session_does_not_tick() {
        let mut s = session();
        assert!(s.poll(Instant::now()).is_empty());
        assert!(s.tick(Instant::now()).is_empty());
        assert_eq!(s.world().snake.head(), Cell::new(10, 10));
    }

    #[test]
    fn start_begins_ticking() {
        let mut s = session();
        let t0 = Instant::now();
        assert_eq!(s.apply(Command::Start, t0), vec![GameEvent::Started]);
        assert_eq!(s.phase(), Phase::Running);
        assert!(s.is_ticking());

        s.world.food = Cell::new(0, 19);
        s.poll(t0);
        assert_eq!(s.world().snake.head(), Cell::new(11, 10));
        // Next tick only after a full period.
        s.poll(t0 + Duration::from_millis(99));
        assert_eq!(s.world().snake.head(), Cell::new(11, 10));
        s.poll(t0 + Duration::from_millis(100));
        assert_eq!(s.world().snake.head(), Cell::new(12, 10));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut s = running();
        assert!(!s.turn(Direction::Left));
        assert_eq!(s.world().direction, Direction::Right);
        assert!(s.turn(Direction::Up));
        assert_eq!(s.world().direction, Direction::Up);

        let mut s = running();
        assert!(s.turn(Direction::Down));
        assert!(!s.turn(Direction::Up));
        assert_eq!(s.world().direction, Direction::Down);
    }

    #[test]
    fn only_the_current_direction_is_compared() {
        // Right → Up → Left between two ticks is accepted step by step.
        let mut s = running();
        s.apply(Command::MoveUp, Instant::now());
        s.apply(Command::MoveLeft, Instant::now());
        assert_eq!(s.world().direction, Direction::Left);
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut s = running();
        assert!(s.toggle_pause());
        assert_eq!(s.phase(), Phase::Paused);
        let before = s.world().clone();
        for _ in 0..10 {
            assert!(s.tick(Instant::now()).is_empty());
        }
        assert_eq!(s.world(), &before);
        assert!(s.is_ticking());

        assert!(s.toggle_pause());
        assert_eq!(s.phase(), Phase::Running);
        s.tick(Instant::now());
        assert_eq!(s.world().snake.head(), Cell::new(11, 10));
    }

    #[test]
    fn pause_is_ignored_outside_a_run() {
        let mut s = session();
        assert!(!s.toggle_pause());
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn eating_emits_food_event() {
        let mut s = running();
        s.world.food = Cell::new(11, 10);
        let events = s.tick(Instant::now());
        assert_eq!(events[0], GameEvent::FoodEaten { x: 11, y: 10, score: 10 });
        assert_eq!(s.score(), 10);
        assert_eq!(s.world().snake.len(), 2);
    }

    #[test]
    fn wall_crash_moves_to_over_and_saves_high_score() {
        let mut s = session_with(MemoryStore { value: 20, ..Default::default() });
        s.start(Instant::now());
        s.world.score = 50;
        s.world.snake = Snake::new(Cell::new(19, 4));
        s.world.food = Cell::new(0, 0);

        let events = s.tick(Instant::now());
        assert_eq!(s.phase(), Phase::Over);
        assert!(!s.is_ticking());
        assert_eq!(events[0], GameEvent::Crashed { kind: CollisionKind::Wall, score: 50 });
        assert_eq!(events[1], GameEvent::NewHighScore { score: 50 });
        assert_eq!(s.high_score(), 50);
        assert_eq!(s.store().writes, vec![50]);
    }

    #[test]
    fn lower_score_leaves_high_score_alone() {
        let mut s = session_with(MemoryStore { value: 200, ..Default::default() });
        s.start(Instant::now());
        s.world.score = 40;
        s.world.snake = Snake::new(Cell::new(19, 4));

        let events = s.tick(Instant::now());
        assert_eq!(events.len(), 1);
        assert_eq!(s.high_score(), 200);
        assert!(s.store().writes.is_empty());
    }

    #[test]
    fn high_score_never_moves_before_game_over() {
        let mut s = running();
        for x in 11..15 {
            s.world.food = Cell::new(x, 10);
            s.tick(Instant::now());
        }
        assert_eq!(s.score(), 40);
        assert_eq!(s.high_score(), 0);
        assert!(s.store().writes.is_empty());
    }

    #[test]
    fn failed_save_still_updates_memory() {
        let mut s = session_with(MemoryStore { fail: true, ..Default::default() });
        s.start(Instant::now());
        s.world.score = 30;
        s.world.snake = Snake::new(Cell::new(19, 4));
        s.tick(Instant::now());
        assert_eq!(s.high_score(), 30);
        assert!(s.message(Instant::now()).is_some());
    }

    #[test]
    fn over_ignores_input_until_start() {
        let mut s = running();
        s.world.snake = Snake::new(Cell::new(19, 4));
        s.tick(Instant::now());
        assert_eq!(s.phase(), Phase::Over);

        assert!(!s.turn(Direction::Up));
        assert!(!s.toggle_pause());
        assert!(s.poll(Instant::now() + Duration::from_secs(5)).is_empty());
        assert!(s.tick(Instant::now()).is_empty());
    }

    #[test]
    fn restart_from_over_resets_everything() {
        let mut s = running();
        s.world.score = 70;
        s.world.direction = Direction::Down;
        s.world.snake = Snake::from_cells(&[Cell::new(4, 19), Cell::new(4, 18)]).unwrap();
        s.tick(Instant::now());
        assert_eq!(s.phase(), Phase::Over);

        s.apply(Command::Start, Instant::now());
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.score(), 0);
        assert_eq!(s.world().snake.cells(), vec![Cell::new(10, 10)]);
        assert_eq!(s.world().direction, Direction::Right);
        assert!(!s.world().is_over);
        assert_eq!(s.high_score(), 70);
        assert!(s.is_ticking());
    }

    #[test]
    fn start_while_paused_runs_unpaused() {
        let mut s = running();
        s.toggle_pause();
        s.start(Instant::now());
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn restart_replaces_the_timer() {
        let mut s = session();
        let t0 = Instant::now();
        s.start(t0);
        s.world.food = Cell::new(0, 19);
        s.poll(t0); // tick at t0, next due t0+100

        // Restart at t0+50: exactly one tick stream, due immediately.
        s.start(t0 + Duration::from_millis(50));
        s.world.food = Cell::new(0, 19);
        s.poll(t0 + Duration::from_millis(50));
        assert_eq!(s.world().snake.head(), Cell::new(11, 10));
        s.poll(t0 + Duration::from_millis(100));
        assert_eq!(s.world().snake.head(), Cell::new(11, 10));
        s.poll(t0 + Duration::from_millis(150));
        assert_eq!(s.world().snake.head(), Cell::new(12, 10));
    }

    #[test]
    fn interval_change_waits_for_the_pending_tick() {
        let mut s = session();
        let t0 = Instant::now();
        s.start(t0);
        s.world.food = Cell::new(0, 19);
        s.poll(t0); // head (11,10), next due t0+100

        assert_eq!(s.apply(Command::SetTickInterval(50), t0), vec![]);
        assert_eq!(s.tick_interval_ms(), 50);
        s.poll(t0 + Duration::from_millis(60));
        assert_eq!(s.world().snake.head(), Cell::new(11, 10));
        s.poll(t0 + Duration::from_millis(100)); // head (12,10), next due t0+150
        s.poll(t0 + Duration::from_millis(150));
        assert_eq!(s.world().snake.head(), Cell::new(13, 10));
    }

    #[test]
    fn interval_is_clamped() {
        let mut s = session();
        assert_eq!(s.set_tick_interval(1, Instant::now()), 50);
        assert_eq!(s.set_tick_interval(10_000, Instant::now()), 300);
    }

    #[test]
    fn speed_message_expires() {
        let mut s = running();
        let t0 = Instant::now();
        assert_eq!(s.set_tick_interval(80, t0), 80);
        assert_eq!(s.message(t0), Some("Speed: 80 ms"));
        assert_eq!(s.message(t0 + Duration::from_millis(1499)), Some("Speed: 80 ms"));
        assert_eq!(s.message(t0 + MESSAGE_TIME), None);
    }

    #[test]
    fn save_failure_message_is_timed_from_the_tick() {
        let mut s = session_with(MemoryStore { fail: true, ..Default::default() });
        let t0 = Instant::now();
        s.start(t0);
        s.world.score = 10;
        s.world.snake = Snake::new(Cell::new(19, 4));
        s.tick(t0);
        assert_eq!(s.message(t0), Some("High score could not be saved"));
        assert_eq!(s.message(t0 + MESSAGE_TIME), None);
    }

    #[test]
    fn session_keeps_the_configured_food_policy() {
        assert_eq!(session().food.policy(), FoodPolicy::SingleDraw);
    }

    #[test]
    fn food_on_snake_is_reported() {
        // 1×2 board: food must be drawn from the two cells; eating the
        // second cell leaves the whole board covered by the snake.
        let mut s = GameSession::with_parts(
            Grid::new(2, 1),
            Cell::new(0, 0),
            SpeedConfig::default(),
            FoodPlacer::new(11, FoodPolicy::SingleDraw),
            MemoryStore::default(),
        );
        s.start(Instant::now());
        s.world.food = Cell::new(1, 0);
        let events = s.tick(Instant::now());
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], GameEvent::FoodOnSnake { .. }));
    }
}
