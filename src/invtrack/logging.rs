//! Logger setup for the binary. The library itself only uses the `log`
//! macros and never installs a logger.
//!
//! Filter precedence: `RUST_LOG`, then `-v` flags, then the configured
//! level, then `warn`.

use log::LevelFilter;

/// Level selected by repeated `-v` flags, if any.
pub fn verbosity_level(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// The filter string handed to `env_logger` when `RUST_LOG` is unset.
pub fn default_filter(verbose: u8, configured: Option<&str>) -> String {
    match (verbosity_level(verbose), configured) {
        (Some(level), _) => level.to_string().to_lowercase(),
        (None, Some(configured)) if !configured.is_empty() => configured.to_string(),
        _ => "warn".to_string(),
    }
}

/// Install `env_logger` writing to stderr. Safe to call more than once;
/// later calls are ignored.
pub fn init(verbose: u8, configured: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or(default_filter(verbose, configured));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
