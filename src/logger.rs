//! Log output over the USB serial JTAG console.
//!
//! Implements the `log` facade so driver messages reach the host through
//! esp-println. Records longer than the line buffer are truncated.

use core::fmt::Write;

use heapless::String;
use log::{LevelFilter, Log, Metadata, Record};

/// Maximum length of a single log line
const MAX_LOG_LINE_LEN: usize = 256;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut line: String<MAX_LOG_LINE_LEN> = String::new();
        let _ = write!(line, "{}", record.args());
        esp_println::println!("{:<5} [{}] {}", record.level(), record.target(), line);
    }

    fn flush(&self) {}
}

/// Install the console logger.
///
/// Must be called once during startup, later calls are ignored.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
