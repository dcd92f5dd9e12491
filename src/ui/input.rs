/// Keyboard input.
///
/// Collects the key presses that arrived since the last frame, in order,
/// and maps each one to a player action:
///   Arrows / WASD       →  Move
///   Enter / Space       →  Start (or restart)
///   P / F1              →  Pause toggle
///   + / -               →  Faster / slower ticks
///   Q / Esc / Ctrl+C    →  Quit
///
/// Turns are edge-triggered, so presses are kept in arrival order: two
/// turns typed within one tick apply one after the other.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

use crate::domain::entity::Direction;

/// What a key (or pad button) asks the game to do.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move(Direction),
    Start,
    TogglePause,
    Faster,
    Slower,
    Quit,
}

pub struct InputState {
    /// Press/Repeat events collected by the last drain, oldest first.
    presses: Vec<KeyEvent>,

    /// Terminal was resized since the last drain.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            resized: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before polling the session.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.resized = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    self.presses.push(key);
                }
                Ok(Event::Resize(_, _)) => self.resized = true,
                _ => {}
            }
        }
    }

    /// Actions for this frame's presses, in arrival order.
    pub fn actions(&self) -> Vec<Action> {
        self.presses.iter().filter_map(action_for_key).collect()
    }
}

fn is_ctrl_c(k: &KeyEvent) -> bool {
    k.modifiers.contains(KeyModifiers::CONTROL)
        && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
}

/// Key → action. Unmapped keys give None.
pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if is_ctrl_c(key) {
        return Some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Action::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Action::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Action::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Action::Move(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Action::Start,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::F(1) => Action::TogglePause,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Faster,
        KeyCode::Char('-') | KeyCode::Char('_') => Action::Slower,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}
