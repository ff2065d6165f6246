//! Development-time tracing for debugging batches.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: diagnostics via `RUST_LOG`, output to stderr.
//!   Not persisted, not part of batch product output.
//!
//! - **Results files (`io/output`)**: product artifacts under the results
//!   directory. Always written, unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset: dependencies at `warn`, this crate at `info`.
pub const DEFAULT_FILTER: &str = "warn,goggles=info";

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to [`DEFAULT_FILTER`] if unset, which
/// shows batch start/end and one event per recorded file.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=goggles=debug goggles process data/reviews
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
