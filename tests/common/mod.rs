#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use filesettle::debounce::{settlement_channel, DebounceCoordinator};
use filesettle::types::SettledFile;

pub use filesettle_test_utils::{
    builders, init_tracing, with_timeout, FakeBackend, RecordingConsumer,
};

pub fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

pub fn millis(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Coordinator rooted at `/w` plus the receiving end of its sink.
pub fn coordinator(
    window: Duration,
) -> (DebounceCoordinator, mpsc::Receiver<SettledFile>, CancellationToken) {
    let (sink, rx) = settlement_channel();
    let shutdown = CancellationToken::new();
    let coord = DebounceCoordinator::new(PathBuf::from("/w"), window, sink, shutdown.clone());
    (coord, rx, shutdown)
}

/// Assert `elapsed` is `expected`, give or take timer-wheel rounding.
pub fn assert_about(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed < expected + millis(50),
        "expected ~{expected:?}, got {elapsed:?}"
    );
}
