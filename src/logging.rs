//! Logger setup for applications embedding the SDK
//!
//! The SDK itself only emits through the `log` facade. These helpers wire
//! `env_logger` so the output can be turned on with `LW_LOG=debug`.

use log::LevelFilter;

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "LW_LOG";

/// Initialize logging from `LW_LOG`. Logging stays off when it is unset.
///
/// Calling this more than once is harmless.
pub fn init() {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::Off);
    init_with_level(level);
}

/// Initialize logging at an explicit level
pub fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init();
}

/// Parse a level name, accepting the usual spellings in any case
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" | "" => Some(LevelFilter::Off),
        _ => None,
    }
}
