// Forwards `log` records to the browser developer console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;


struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

// Safe to call more than once: only the first call installs the logger.
pub fn init_logger(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
