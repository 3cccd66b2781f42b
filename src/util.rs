use log::LevelFilter;

use crate::config::Config;

/// Upper-case the first character, leave the rest alone ("mr-mime" -> "Mr-mime")
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Route `log` records to the browser console at the configured level.
///
/// Safe to call more than once: later calls only change the level.
pub fn init_logging(config: &Config) {
    let level = config.level_filter().unwrap_or(LevelFilter::Info);
    if let Some(max) = level.to_level() {
        // Err just means a logger is already installed
        let _ = console_log::init_with_level(max);
    }
    log::set_max_level(level);
}
