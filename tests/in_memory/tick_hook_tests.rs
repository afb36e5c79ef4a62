//! Tick forwarding through hooks and reporters created by the core.

use super::helpers::{Harness, RecordingListener, active_harness, harness};
use rstest::rstest;
use spark_bridge::platform::{domain::SubscriptionState, ports::PlatformCapabilities};
use std::sync::Arc;

#[rstest]
fn active_core_samples_every_tick(active_harness: Harness) {
    active_harness.tick(3, 50);

    let core = active_harness.core();
    assert_eq!(core.tick_starts(), vec![1, 2, 3]);
    assert_eq!(core.tick_durations(), vec![50, 50, 50]);
}

#[rstest]
fn closed_hook_misses_later_ticks(active_harness: Harness) {
    let platform = active_harness
        .lifecycle
        .platform()
        .expect("active plugin should expose its platform");
    let listener = Arc::new(RecordingListener::default());
    let hook = platform.create_tick_hook(listener.clone());

    hook.start().expect("hook should start");
    active_harness.tick(10, 50);
    hook.close();
    active_harness.tick(5, 50);

    assert_eq!(listener.count(), 10);
    assert_eq!(hook.state(), SubscriptionState::Unregistered);
}

#[rstest]
fn shutdown_stops_tick_sampling(active_harness: Harness) {
    active_harness.tick(3, 50);
    active_harness.lifecycle.deactivate();
    active_harness.tick(2, 50);

    assert_eq!(active_harness.core().tick_starts().len(), 3);
    assert_eq!(active_harness.ticks.tick_start_callback_count(), 0);
    assert_eq!(active_harness.ticks.tick_end_callback_count(), 0);
}

#[rstest]
#[case(&[(true, 4), (false, 3), (true, 2)], 6)]
#[case(&[(false, 5), (true, 1), (true, 1)], 2)]
#[case(&[(true, 0), (false, 7), (false, 1)], 0)]
fn forwarded_count_matches_active_ticks(
    harness: Harness,
    #[case] phases: &[(bool, usize)],
    #[case] expected: usize,
) {
    harness.lifecycle.activate();
    let platform = harness
        .lifecycle
        .platform()
        .expect("active plugin should expose its platform");
    let listener = Arc::new(RecordingListener::default());
    let hook = platform.create_tick_hook(listener.clone());

    for &(active, ticks) in phases {
        if active {
            if hook.state().is_active() {
                assert!(hook.start().is_err());
            } else {
                hook.start().expect("hook should start");
            }
        } else {
            hook.close();
        }
        harness.tick(ticks, 50);
    }

    assert_eq!(listener.count(), expected);
}
