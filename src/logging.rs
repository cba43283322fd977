use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bench::Timing;

/// Install the global fmt subscriber
///
/// Honors `RUST_LOG`; falls back to `default_directive` (e.g. `info`) when
/// the variable is unset or unparsable. Calling it twice is harmless.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Print a benchmark timing line to stdout and mirror it as an event
pub fn log_timing(timing: &Timing) {
    println!("{}", timing);
    info!(
        target: "timing",
        approach = %timing.approach,
        operation = %timing.operation,
        elapsed_ms = timing.elapsed.as_millis() as u64,
        count = timing.count,
        "{}",
        timing
    );
}
