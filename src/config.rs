/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::entity::Cell;
use crate::domain::food::FoodPolicy;
use crate::domain::grid::{Grid, MAX_SIDE};
use crate::sim::world::START_CELL;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub speed: SpeedConfig,
    pub food: FoodConfig,
    pub gamepad: GamepadConfig,
    /// None disables logging. Relative paths are resolved by `log_path`.
    pub log_file: Option<PathBuf>,
    /// Problems found while resolving the file; logged once the logger is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    pub grid: Grid,
    pub start: Cell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedConfig {
    pub tick_interval_ms: u64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub interval_step_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoodConfig {
    pub policy: FoodPolicy,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub start: Vec<String>,
    pub pause: Vec<String>,
    pub faster: Vec<String>,
    pub slower: Vec<String>,
}

impl SpeedConfig {
    pub fn clamp(&self, ms: u64) -> u64 {
        ms.clamp(self.min_interval_ms, self.max_interval_ms)
    }

    /// One step shorter interval (faster snake).
    pub fn faster(&self, ms: u64) -> u64 {
        self.clamp(ms.saturating_sub(self.interval_step_ms))
    }

    /// One step longer interval (slower snake).
    pub fn slower(&self, ms: u64) -> u64 {
        self.clamp(ms.saturating_add(self.interval_step_ms))
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            tick_interval_ms: default_tick_interval(),
            min_interval_ms: default_min_interval(),
            max_interval_ms: default_max_interval(),
            interval_step_ms: default_interval_step(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            grid: Grid::from_pixels(default_width_px(), default_height_px(), default_cell_px()),
            start: Cell::new(default_start_x(), default_start_y()),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    food: TomlFood,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_width_px")]
    width_px: u32,
    #[serde(default = "default_height_px")]
    height_px: u32,
    #[serde(default = "default_cell_px")]
    cell_px: u32,
    #[serde(default = "default_start_x")]
    start_x: i32,
    #[serde(default = "default_start_y")]
    start_y: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_interval")]
    tick_interval_ms: u64,
    #[serde(default = "default_min_interval")]
    min_interval_ms: u64,
    #[serde(default = "default_max_interval")]
    max_interval_ms: u64,
    #[serde(default = "default_interval_step")]
    interval_step_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlFood {
    #[serde(default = "default_food_policy")]
    policy: String,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_start")]
    start: Vec<String>,
    #[serde(default = "default_pad_pause")]
    pause: Vec<String>,
    #[serde(default = "default_pad_faster")]
    faster: Vec<String>,
    #[serde(default = "default_pad_slower")]
    slower: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_width_px() -> u32 { 400 }
fn default_height_px() -> u32 { 400 }
fn default_cell_px() -> u32 { 20 }
fn default_start_x() -> i32 { START_CELL.x }
fn default_start_y() -> i32 { START_CELL.y }

fn default_tick_interval() -> u64 { 100 }
fn default_min_interval() -> u64 { 50 }
fn default_max_interval() -> u64 { 300 }
fn default_interval_step() -> u64 { 10 }

fn default_food_policy() -> String { "single_draw".into() }

fn default_pad_start() -> Vec<String> { vec!["Start".into()] }
fn default_pad_pause() -> Vec<String> { vec!["Select".into()] }
fn default_pad_faster() -> Vec<String> { vec!["R1".into()] }
fn default_pad_slower() -> Vec<String> { vec!["L1".into()] }

fn default_log_file() -> String { "snake.log".into() }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            width_px: default_width_px(),
            height_px: default_height_px(),
            cell_px: default_cell_px(),
            start_x: default_start_x(),
            start_y: default_start_y(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_interval_ms: default_tick_interval(),
            min_interval_ms: default_min_interval(),
            max_interval_ms: default_max_interval(),
            interval_step_ms: default_interval_step(),
        }
    }
}

impl Default for TomlFood {
    fn default() -> Self {
        TomlFood { policy: default_food_policy(), seed: None }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            start: default_pad_start(),
            pause: default_pad_pause(),
            faster: default_pad_faster(),
            slower: default_pad_slower(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { log_file: default_log_file() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/snake.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let Some(text) = read_config_text(&search_dirs) else {
            return Self::default();
        };
        Self::parse(&text).unwrap_or_else(|e| {
            eprintln!("Warning: config.toml parse error: {e}");
            eprintln!("Using default settings.");
            Self::default()
        })
    }

    /// Parse a config body directly (no file search).
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(resolve)
    }

    /// Log file location, with a relative name placed under `base`.
    pub fn log_path(&self, base: &Path) -> Option<PathBuf> {
        self.log_file.as_ref().map(|p| {
            if p.is_absolute() { p.clone() } else { base.join(p) }
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        resolve(TomlConfig::default())
    }
}

/// Turn raw TOML values into a validated config.
fn resolve(toml_cfg: TomlConfig) -> GameConfig {
    let mut warnings = vec![];

    // Board: at least one whole cell in each direction, at most MAX_SIDE
    let b = &toml_cfg.board;
    let usable = b.cell_px > 0 && b.width_px >= b.cell_px && b.height_px >= b.cell_px;
    let grid = Grid::from_pixels(b.width_px, b.height_px, b.cell_px);
    let board = if !usable || !grid.fits(MAX_SIDE) {
        warnings.push(format!(
            "board {}x{} px with {} px cells is unusable (1..={} cells per side); using 400x400/20",
            b.width_px, b.height_px, b.cell_px, MAX_SIDE
        ));
        BoardConfig::default()
    } else {
        let wanted = Cell::new(b.start_x, b.start_y);
        let start = if grid.is_in_bounds(wanted) {
            wanted
        } else {
            warnings.push(format!(
                "start cell ({}, {}) is off the {}x{} board; using the centre",
                wanted.x, wanted.y, grid.width, grid.height
            ));
            grid.center()
        };
        BoardConfig { grid, start }
    };

    // Speed: ordered, non-zero bounds; default interval inside them
    let s = &toml_cfg.speed;
    let min = s.min_interval_ms.max(1);
    let max = s.max_interval_ms.max(min);
    if max != s.max_interval_ms || min != s.min_interval_ms {
        warnings.push(format!(
            "speed bounds {}..{} ms adjusted to {}..{} ms",
            s.min_interval_ms, s.max_interval_ms, min, max
        ));
    }
    let tick = s.tick_interval_ms.clamp(min, max);
    if tick != s.tick_interval_ms {
        warnings.push(format!(
            "tick_interval_ms {} clamped to {}",
            s.tick_interval_ms, tick
        ));
    }
    let speed = SpeedConfig {
        tick_interval_ms: tick,
        min_interval_ms: min,
        max_interval_ms: max,
        interval_step_ms: s.interval_step_ms.max(1),
    };

    let policy = FoodPolicy::from_name(&toml_cfg.food.policy).unwrap_or_else(|| {
        warnings.push(format!(
            "unknown food policy \"{}\"; using single_draw",
            toml_cfg.food.policy
        ));
        FoodPolicy::SingleDraw
    });

    let log_file = match toml_cfg.general.log_file.trim() {
        "" => None,
        name => Some(PathBuf::from(name)),
    };

    GameConfig {
        board,
        speed,
        food: FoodConfig { policy, seed: toml_cfg.food.seed },
        gamepad: GamepadConfig {
            start: toml_cfg.gamepad.start,
            pause: toml_cfg.gamepad.pause,
            faster: toml_cfg.gamepad.faster,
            slower: toml_cfg.gamepad.slower,
        },
        log_file,
        warnings,
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/snake)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/snake");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Text of the first readable config.toml in the candidate directories.
fn read_config_text(search_dirs: &[PathBuf]) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some(text),
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    None
}
