/// Scripted input.
pub mod source;
/// Recording screen.
pub mod screen;
/// Journaling view kind.
pub mod probe;
/// Kernel harness wiring the above together.
pub mod harness;

use tracing_subscriber::{EnvFilter, fmt};

/// Send kernel logs to the test writer, filtered by `RUST_LOG`. Safe to
/// call from every test.
pub fn init_tracing() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
