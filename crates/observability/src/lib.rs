//! Process-wide tracing setup shared by the back-office binaries and tests.

pub mod subscriber;

/// Initialize JSON logging for the process, filtered by `RUST_LOG`
/// (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init(subscriber::DEFAULT_FILTER);
}

/// Human-readable logs captured by the test harness.
pub fn init_for_tests() {
    subscriber::init_test();
}
