/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move (edge-triggered)
///   Start                 →  Start / Restart
///   Select                →  Pause toggle
///   R1                    →  Faster
///   L1                    →  Slower

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;
use super::input::Action;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Face, shoulder and menu buttons the action map can name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

/// Config spellings per button (matched case-insensitively).
const BTN_NAMES: [(Btn, &[&str]); BTN_COUNT] = [
    (Btn::A, &["a", "south"]),
    (Btn::B, &["b", "east"]),
    (Btn::X, &["x", "west"]),
    (Btn::Y, &["y", "north"]),
    (Btn::L1, &["l1", "lb", "lefttrigger"]),
    (Btn::R1, &["r1", "rb", "righttrigger"]),
    (Btn::L2, &["l2", "lt", "lefttrigger2"]),
    (Btn::R2, &["r2", "rt", "righttrigger2"]),
    (Btn::Start, &["start"]),
    (Btn::Select, &["select", "back"]),
];

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        let s = s.trim().to_ascii_lowercase();
        BTN_NAMES
            .iter()
            .find(|(_, names)| names.contains(&s.as_str()))
            .map(|&(btn, _)| btn)
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        Some(match btn {
            Button::South => Btn::A,
            Button::East => Btn::B,
            Button::West => Btn::X,
            Button::North => Btn::Y,
            Button::LeftTrigger => Btn::L1,
            Button::RightTrigger => Btn::R1,
            Button::LeftTrigger2 => Btn::L2,
            Button::RightTrigger2 => Btn::R2,
            Button::Start => Btn::Start,
            Button::Select => Btn::Select,
            _ => return None,
        })
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    start: Vec<Btn>,
    pause: Vec<Btn>,
    faster: Vec<Btn>,
    slower: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            start:  vec![Btn::Start],
            pause:  vec![Btn::Select],
            faster: vec![Btn::R1],
            slower: vec![Btn::L1],
        }
    }
}

impl ActionMap {
    /// Replace each list that names at least one known button.
    fn apply(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        for (names, slot) in [
            (&cfg.start, &mut self.start),
            (&cfg.pause, &mut self.pause),
            (&cfg.faster, &mut self.faster),
            (&cfg.slower, &mut self.slower),
        ] {
            let btns = parse_list(names);
            if !btns.is_empty() { *slot = btns; }
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last update, indexed by Btn.
    just_pressed: [bool; BTN_COUNT],

    // D-pad: fresh presses this frame
    dpad: Option<Direction>,

    // Stick: held direction and fresh crossing of the deadzone
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_held: Option<Direction>,
    stick: Option<Direction>,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: [false; BTN_COUNT],
            dpad: None,
            stick_held: None,
            stick: None,
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map.apply(cfg);
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dpad = None;
        self.stick = None;

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_held = None;
                }
                _ => {}
            }
        }

        // Stick → one direction, the dominant axis past the deadzone
        let held = stick_direction(self.stick_x, self.stick_y);
        if held.is_some() && held != self.stick_held {
            self.stick = held;
        }
        self.stick_held = held;
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        // D-pad handled separately (not in Btn enum)
        let dir = match gilrs_btn {
            Button::DPadUp    => Some(Direction::Up),
            Button::DPadDown  => Some(Direction::Down),
            Button::DPadLeft  => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(d) = dir {
            self.dpad = Some(d);
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.just_pressed[btn_index(btn)] = true;
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[btn_index(b)])
    }

    /// Actions pressed since the last update.
    pub fn actions(&self) -> Vec<Action> {
        let mut out = vec![];
        if let Some(d) = self.dpad.or(self.stick) {
            out.push(Action::Move(d));
        }
        let map = &self.action_map;
        if self.any_just_pressed(&map.start) { out.push(Action::Start); }
        if self.any_just_pressed(&map.pause) { out.push(Action::TogglePause); }
        if self.any_just_pressed(&map.faster) { out.push(Action::Faster); }
        if self.any_just_pressed(&map.slower) { out.push(Action::Slower); }
        out
    }
}

/// Left stick position → direction. Screen up is positive Y on gilrs.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x < 0.0 { Direction::Left } else { Direction::Right })
    } else {
        Some(if y > 0.0 { Direction::Up } else { Direction::Down })
    }
}
