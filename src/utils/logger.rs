// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::sync::{Mutex, OnceLock};

// Warnings and errors kept for later inspection (e.g. run summaries)
const HISTORY_CAPACITY: usize = 256;

static HISTORY: OnceLock<Mutex<Vec<String>>> = OnceLock::new();
static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

/// Installs the stderr logger. Fails if another logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Like [`init`], but tolerates an already installed logger and only
/// adjusts the level.
pub fn init_console(level: LevelFilter) {
    if init(level).is_err() {
        log::set_max_level(level);
    }
}

/// Recorded warning and error lines, oldest first.
pub fn history() -> Vec<String> {
    match HISTORY.get() {
        Some(lock) => match lock.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        },
        None => Vec::new(),
    }
}

fn record_history(line: String) {
    let lock = HISTORY.get_or_init(|| Mutex::new(Vec::new()));
    let mut lines = match lock.lock() {
        Ok(lines) => lines,
        Err(poisoned) => poisoned.into_inner(),
    };
    if lines.len() >= HISTORY_CAPACITY {
        lines.remove(0);
    }
    lines.push(line);
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let icon = match record.level() {
            Level::Error => "🔴",
            Level::Warn => "🟠",
            Level::Info => "🔵",
            Level::Debug => "⚪",
            Level::Trace => "▫️",
        };

        // Format: "🟠 [xatu::physics::system] Filling must be ..."
        let msg = format!("{} [{}] {}", icon, record.target(), record.args());

        if record.level() <= Level::Warn {
            record_history(msg.clone());
        }
        eprintln!("{}", msg);
    }

    fn flush(&self) {}
}
