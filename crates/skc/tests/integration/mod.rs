//! Integration tests for the SKC pipeline.
//!
//! These tests drive the public API end to end: dense tensors through the
//! three stages, wire envelopes, and concurrent use of one pipeline.

mod concurrency;
mod envelope;
mod roundtrip;

/// Route pipeline logs to the test harness; `RUST_LOG=skc=debug` shows stages.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
