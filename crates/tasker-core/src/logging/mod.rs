//! Structured logging with `tracing`.
//!
//! Library crates only emit events through the `tracing` macros; the binary
//! decides where they go by calling [`init_subscriber`] once at startup.
//! Tests install a thread-local capture layer via [`capture_logs`] instead.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Default filter directive when neither `RUST_LOG` nor settings provide one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
/// `RUST_LOG` takes precedence over `level` when it is set and valid.
///
/// # Arguments
///
/// * `level` - Minimum log level (or full filter directive) to display.
pub fn init_subscriber(level: &str) {
    let filter = build_filter(level);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}

/// Resolve the filter: `RUST_LOG` first, then `level`, then [`DEFAULT_LEVEL`].
fn build_filter(level: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
