//! Diagnostic tracing for the planner binaries.
//!
//! At the default `warn` level the planner reports a solve that stopped at
//! the sweep cap (with the last delta and `theta`) and a walk that stopped
//! short of the goal; the scenario harness adds every case that did not
//! succeed. `info` adds the reachability gate decision and the
//! step count of a finished path; `debug` adds per-solve sweep counts, the
//! merged solver config and each scenario check.
//!
//! Everything goes to stderr; stdout carries tables, JSON and generated grids.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "warn";

/// Install the global fmt subscriber.
///
/// ```bash
/// RUST_LOG=gridworld=debug gridworld solve grid.toml
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
