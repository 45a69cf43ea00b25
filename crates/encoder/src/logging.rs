//! Explicit logging setup.
//!
//! The encoder only emits `tracing` events; nothing is printed unless a subscriber is
//! installed. [`LoggingHandle`] installs a `tracing-subscriber` fmt subscriber as the
//! default for the current thread and restores the previous default when dropped, so
//! there is no process-wide logging state to clean up.

use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::FmtSubscriber;

/// Keeps a thread-default subscriber installed for as long as it lives.
///
/// ```
/// use micro_http_encoder::logging::LoggingHandle;
/// use tracing::Level;
///
/// let _logging = LoggingHandle::init(Level::DEBUG);
/// tracing::debug!("visible while the handle lives");
/// ```
#[derive(Debug)]
#[must_use = "logging is uninstalled when the handle is dropped"]
pub struct LoggingHandle {
    _guard: DefaultGuard,
}

impl LoggingHandle {
    /// Logs events up to `level` to stdout.
    pub fn init(level: Level) -> Self {
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        Self { _guard: tracing::subscriber::set_default(subscriber) }
    }

    /// Logs every event through the test harness writer, so output is captured per test.
    pub fn for_tests() -> Self {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).with_test_writer().finish();
        Self { _guard: tracing::subscriber::set_default(subscriber) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_nest_and_unwind() {
        let outer = LoggingHandle::init(Level::INFO);
        {
            let _inner = LoggingHandle::for_tests();
            tracing::trace!("inner subscriber");
        }
        tracing::info!("outer subscriber");
        drop(outer);
    }
}
