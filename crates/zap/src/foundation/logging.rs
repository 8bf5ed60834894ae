//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Honors `RUST_LOG` and falls back to `info`. Calling this more than once is
/// harmless; only the first call installs the logger.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already installed, keeping the existing one");
    }
}

/// Initialize the logging system with an explicit filter (e.g. `"zap=debug"`)
pub fn init_with_filter(filter: &str) {
    if env_logger::Builder::new()
        .parse_filters(filter)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already installed, ignoring filter '{}'", filter);
    }
}

/// Initialize a logger suitable for unit tests (captured output, debug level)
pub fn init_for_tests() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .parse_filters("debug")
        .try_init();
}
