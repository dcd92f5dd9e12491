/// High score persistence.
///
/// ## File format:
///   One key-value line: `snakeHighScore=<n>`.
///   Missing file, missing key or a non-numeric value all read as 0.
///
/// Stored as highscore.dat next to the executable when that directory is
/// writable, otherwise under ~/.local/share/snake.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const HIGH_SCORE_KEY: &str = "snakeHighScore";
const SAVE_FILE: &str = "highscore.dat";

/// Where the session loads and saves its single persisted number.
pub trait HighScoreStore {
    fn load_high_score(&self) -> u32;
    fn save_high_score(&mut self, score: u32) -> Result<()>;
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

pub fn save_dir() -> PathBuf {
    // 1. Exe directory (local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let test_path = parent.join(".write_test_snake");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/snake");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// File store
// ══════════════════════════════════════════════════════════════

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// Store in the default save directory.
    pub fn open_default() -> Self {
        FileStore::new(save_dir().join(SAVE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load_high_score(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_high_score(&content),
            Err(_) => 0,
        }
    }

    fn save_high_score(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        std::fs::write(&self.path, serialize(score))
            .with_context(|| format!("writing high score to {}", self.path.display()))
    }
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

fn serialize(score: u32) -> String {
    format!("{}={}\n", HIGH_SCORE_KEY, score)
}

/// Read the high score out of a save file body. Anything unusable is 0.
pub fn parse_high_score(content: &str) -> u32 {
    for line in content.lines() {
        let line = line.trim();
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == HIGH_SCORE_KEY {
                return value.trim().parse().unwrap_or(0);
            }
        }
    }
    0
}

// ══════════════════════════════════════════════════════════════
// In-memory store (tests)
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub value: u32,
    pub writes: Vec<u32>,
    pub fail: bool,
}

#[cfg(test)]
impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> u32 {
        self.value
    }

    fn save_high_score(&mut self, score: u32) -> Result<()> {
        if self.fail {
            anyhow::bail!("store is read-only");
        }
        self.value = score;
        self.writes.push(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("snake-test-{}-{}", std::process::id(), name))
            .join(SAVE_FILE)
    }

    #[test]
    fn parses_the_keyed_line() {
        assert_eq!(parse_high_score("snakeHighScore=120\n"), 120);
        assert_eq!(parse_high_score("other=5\nsnakeHighScore = 40 \n"), 40);
    }

    #[test]
    fn garbage_reads_as_zero() {
        assert_eq!(parse_high_score(""), 0);
        assert_eq!(parse_high_score("snakeHighScore=abc"), 0);
        assert_eq!(parse_high_score("snakeHighScore=-30"), 0);
        assert_eq!(parse_high_score("120"), 0);
        assert_eq!(parse_high_score("highScore=50"), 0);
    }

    #[test]
    fn missing_file_reads_as_zero() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn file_store_keeps_the_last_write() {
        let path = temp_path("write");
        let mut store = FileStore::new(&path);
        store.save_high_score(30).unwrap();
        store.save_high_score(250).unwrap();
        assert_eq!(store.load_high_score(), 250);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "snakeHighScore=250\n");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
