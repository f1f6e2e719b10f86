// tests/property_debounce.rs

mod common;
use crate::common::{coordinator, millis};

use std::path::PathBuf;
use std::time::Duration;

use proptest::prelude::*;
use tokio::time::{sleep, timeout, Instant};

use filesettle::types::OpKind;

const WINDOW_MS: u64 = 1_000;

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("runtime")
}

fn qualifying() -> impl Strategy<Value = OpKind> {
    prop_oneof![Just(OpKind::Create), Just(OpKind::Write)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any burst of changes spaced closer than the window settles exactly
    /// once, one window after the last change.
    #[test]
    fn burst_settles_once_after_last_change(
        steps in prop::collection::vec((0..WINDOW_MS, qualifying()), 0..12),
    ) {
        let (elapsed, extra) = paused_runtime().block_on(async {
            let (coord, mut rx, _shutdown) = coordinator(millis(WINDOW_MS));
            let path = PathBuf::from("/w/burst.dat");
            let start = Instant::now();

            coord.observe(path.clone(), OpKind::Create);
            for (gap, kind) in &steps {
                sleep(millis(*gap)).await;
                coord.observe(path.clone(), *kind);
            }

            let settled = rx.recv().await.expect("settlement");
            assert_eq!(settled.path, path);
            let elapsed = start.elapsed();
            let extra = timeout(millis(5 * WINDOW_MS), rx.recv()).await;
            (elapsed, extra.is_ok())
        });

        let quiet: u64 = steps.iter().map(|(gap, _)| gap).sum();
        let expected = Duration::from_millis(quiet + WINDOW_MS);
        prop_assert!(elapsed >= expected, "settled early: {elapsed:?} < {expected:?}");
        prop_assert!(elapsed < expected + millis(50), "settled late: {elapsed:?}");
        prop_assert!(!extra, "file settled twice");
    }

    /// A burst ending in a remove or rename never settles.
    #[test]
    fn burst_ending_in_cancel_never_settles(
        steps in prop::collection::vec((0..WINDOW_MS, qualifying()), 0..8),
        last_gap in 0..WINDOW_MS,
        cancel in prop_oneof![Just(OpKind::Remove), Just(OpKind::Rename)],
    ) {
        let (settled, pending) = paused_runtime().block_on(async {
            let (coord, mut rx, _shutdown) = coordinator(millis(WINDOW_MS));
            let path = PathBuf::from("/w/burst.dat");

            coord.observe(path.clone(), OpKind::Create);
            for (gap, kind) in &steps {
                sleep(millis(*gap)).await;
                coord.observe(path.clone(), *kind);
            }
            sleep(millis(last_gap)).await;
            coord.observe(path.clone(), cancel);

            let settled = timeout(millis(5 * WINDOW_MS), rx.recv()).await.is_ok();
            (settled, coord.pending_count())
        });

        prop_assert!(!settled);
        prop_assert_eq!(pending, 0);
    }
}
