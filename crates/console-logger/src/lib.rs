//! Console Logger
//!
//! `log` backend for the browser: every record goes to the devtools console
//! (stderr when running on the host) and the most recent lines are kept in a
//! rolling buffer so the UI can show them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Default number of lines kept in the rolling buffer
pub const DEFAULT_CAPACITY: usize = 200;

/// Fixed-size ring of formatted log lines
#[derive(Debug)]
pub struct RollingBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Append a line, dropping the oldest once full
    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

/// Cloneable read access to the logger's buffer
#[derive(Clone, Debug)]
pub struct LogHandle {
    buffer: Arc<Mutex<RollingBuffer>>,
}

impl LogHandle {
    /// Most recent records, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|buffer| buffer.snapshot())
            .unwrap_or_default()
    }
}

pub struct ConsoleLogger {
    level: LevelFilter,
    buffer: Arc<Mutex<RollingBuffer>>,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        Self {
            level,
            buffer: Arc::new(Mutex::new(RollingBuffer::new(capacity))),
        }
    }

    pub fn handle(&self) -> LogHandle {
        LogHandle {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Render a record as `<timestamp> <LEVEL> <target>: <message>`
pub fn format_record(record: &Record) -> String {
    format!(
        "{} {:<5} {}: {}",
        Utc::now().format("%H:%M:%S%.3f"),
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        write_console(record.level(), &line);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(line);
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    use wasm_bindgen::JsValue;

    let value = JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the logger globally. Can only succeed once per process.
pub fn init(level: LevelFilter, capacity: usize) -> Result<LogHandle, SetLoggerError> {
    let logger = ConsoleLogger::new(level, capacity);
    let handle = logger.handle();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(handle)
}
