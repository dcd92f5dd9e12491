/// Entry point and game loop.

mod config;
mod domain;
mod logger;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use domain::entity::Direction;
use sim::event::GameEvent;
use sim::save::{FileStore, HighScoreStore};
use sim::session::{Command, GameSession};
use ui::gamepad::GamepadState;
use ui::input::{Action, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let log_path = config.log_path(&sim::save::save_dir());
    if let Err(e) = logger::init_logger(log_path.as_deref()) {
        eprintln!("Warning: could not open log file: {e}");
    }
    log!("snake starting");
    for w in &config.warnings {
        eprintln!("Warning: {w}");
        log!("config: {}", w);
    }

    let store = FileStore::open_default();
    log!("high score file: {}", store.path().display());
    let mut session = GameSession::new(&config, store);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log!("game loop error: {}", e);
        eprintln!("Game error: {e}");
    }

    log!("exit: score {}, high score {}", session.score(), session.high_score());
    println!();
    println!("Thanks for playing Snake!");
    println!("Final Score: {}", session.score());
    println!("High Score:  {}", session.high_score());
}

fn game_loop<S: HighScoreStore>(
    session: &mut GameSession<S>,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log!("gamepad connected");
    }

    loop {
        kb.drain_events();
        gp.update();

        if kb.resized {
            renderer.invalidate();
        }

        let now = Instant::now();
        let actions = kb.actions().into_iter().chain(gp.actions());
        for action in actions {
            let Some(command) = command_for(action, session) else {
                return Ok(());
            };
            let events = session.apply(command, now);
            process_events(sound, &events);
        }

        let events = session.poll(now);
        process_events(sound, &events);

        renderer.render(session, Instant::now())?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

/// Map a player action to a session command. None means quit.
fn command_for<S: HighScoreStore>(action: Action, session: &GameSession<S>) -> Option<Command> {
    let speed = session.speed();
    let ms = session.tick_interval_ms();
    let command = match action {
        Action::Quit => return None,
        Action::Move(Direction::Up) => Command::MoveUp,
        Action::Move(Direction::Down) => Command::MoveDown,
        Action::Move(Direction::Left) => Command::MoveLeft,
        Action::Move(Direction::Right) => Command::MoveRight,
        Action::Start => Command::Start,
        Action::TogglePause => Command::TogglePause,
        Action::Faster => Command::SetTickInterval(speed.faster(ms)),
        Action::Slower => Command::SetTickInterval(speed.slower(ms)),
    };
    Some(command)
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for ev in events {
        if let Some(sfx) = sound {
            sfx.on_event(ev);
        }
    }
}
