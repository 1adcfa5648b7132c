use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Route engine logs through the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_test_writer())
        .try_init();
}
