#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature the usual macros are re-exported from
//! [`tracing`]. Without it, no-op macros with the same names are exported at
//! the crate root so call sites such as `crate::debug!(...)` compile either
//! way.
//!
//! The `tracing-json` feature additionally provides
//! [`init_json_subscriber`], a JSON formatter filtered by the `SNAPDOCK_LOG`
//! environment variable.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, trace_span, warn};

/// Environment variable holding the `EnvFilter` directive for
/// [`init_json_subscriber`].
pub const LOG_FILTER_ENV: &str = "SNAPDOCK_LOG";

// Stand-ins with the same names, used when the `tracing` feature is off.
// Event macros swallow their arguments; span macros yield a `NoopSpan`.
#[cfg(not(feature = "tracing"))]
mod noop_macros {
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Span returned by `trace_span!` without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Matches `tracing::Span::enter`; the guard does nothing.
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;

/// Install a global JSON subscriber filtered by [`LOG_FILTER_ENV`].
///
/// Falls back to `info` when the variable is unset or unparsable. Returns
/// `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .is_ok()
}
