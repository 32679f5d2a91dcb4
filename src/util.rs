// Small browser helpers shared by the views and the persistence layer.

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Browser local storage, or `None` off-browser or when storage is blocked.
pub fn local_storage() -> Option<web_sys::Storage> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()?.local_storage().ok().flatten()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Seed for a new session's generators. Fixed off-browser.
pub fn session_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let lo = js_sys::Date::now() as u64;
        (hi << 32) ^ lo
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        0x5eed
    }
}

/// Whole-unit climb distance, e.g. `1234 m`.
pub fn format_score(score: f64) -> String {
    format!("{} m", score.max(0.0).floor() as u64)
}

/// Forwards `log` records to the browser console.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    pub fn install(max: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(max);
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = format!("[{}] {}", record.target(), record.args());
        clog(record.level(), &msg);
    }

    fn flush(&self) {}
}

fn clog(level: Level, msg: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let v = wasm_bindgen::JsValue::from_str(msg);
        match level {
            Level::Error => web_sys::console::error_1(&v),
            Level::Warn => web_sys::console::warn_1(&v),
            Level::Info => web_sys::console::info_1(&v),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&v),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (level, msg);
    }
}
