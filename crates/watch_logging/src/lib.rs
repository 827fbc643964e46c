#![deny(missing_docs)]
//! Logging helpers shared by the keyword-watch crates.
//!
//! Every crate logs through the `watch_*` macros so the facade can be swapped
//! in one place. Binaries install the real logger; tests call
//! [`initialize_for_tests`].

use std::sync::Once;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

static TEST_LOGGER: Once = Once::new();

/// Installs a logger suitable for `cargo test`.
///
/// Output goes through the test harness capture. Calling this more than once,
/// or after another logger was installed, is a no-op.
pub fn initialize_for_tests() {
    use simplelog::{Config, TestLogger};

    TEST_LOGGER.call_once(|| {
        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        let _ = TestLogger::init(level, Config::default());
    });
}
