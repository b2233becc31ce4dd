//! Tracing init.
//!
//! Honors NSDOCK_QUIET (warn and above only), NSDOCK_LOG_LEVEL and
//! NSDOCK_LOG_JSON; an explicit RUST_LOG still wins.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize tracing. Call once at process startup; later calls are no-ops.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "nsdock=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
