//! `log` backend writing to the browser console.

use wasm_bindgen::JsValue;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = if record.target().is_empty() {
            record.module_path().unwrap_or_default()
        } else {
            record.target()
        };
        let line = format_record(record.level(), target, &record.args().to_string());
        let message = JsValue::from_str(&line);
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            log::Level::Info => web_sys::console::info_1(&message),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger with `level` as the maximum level.
///
/// Installing twice keeps the first logger and only updates the level.
pub fn init(level: log::LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// One console line: `[svg-crowbar] LEVEL target: message`.
#[must_use]
pub fn format_record(level: log::Level, target: &str, message: &str) -> String {
    format!("[svg-crowbar] {level} {target}: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_line_layout() {
        assert_eq!(
            format_record(log::Level::Warn, "crowbar_extract::extract", "skipped svg #2"),
            "[svg-crowbar] WARN crowbar_extract::extract: skipped svg #2"
        );
    }
}
