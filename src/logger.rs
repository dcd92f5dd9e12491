/// File logger with timestamped lines.
///
/// The terminal belongs to the renderer while the game runs, so log lines
/// go to a file instead of stdout. Logging before `init_logger()` or with
/// no file configured is silently dropped.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    sink: Option<Mutex<File>>,
}

impl Logger {
    fn new(sink: Option<File>) -> Self {
        Self { sink: sink.map(Mutex::new) }
    }

    pub fn log(&self, message: &str) {
        let Some(sink) = &self.sink else { return };
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        if let Ok(mut file) = sink.lock() {
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }
}

/// Open (append) the log file. Returns the open error, if any; logging is
/// then disabled for the rest of the run.
pub fn init_logger(path: Option<&Path>) -> std::io::Result<()> {
    let (file, result) = match path {
        Some(p) => match OpenOptions::new().create(true).append(true).open(p) {
            Ok(f) => (Some(f), Ok(())),
            Err(e) => (None, Err(e)),
        },
        None => (None, Ok(())),
    };
    LOGGER.get_or_init(|| Logger::new(file));
    result
}

pub fn log(message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
