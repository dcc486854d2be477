use std::time::Duration;

use super::*;

#[test]
fn sleeps_remainder_of_period() {
    let clock = ManualClock::new();
    let mut pacer = FramePacer::with_period(Duration::from_millis(100), &clock);

    clock.advance(Duration::from_millis(30));
    let slept = pacer.pace(&clock);
    assert_eq!(slept, Duration::from_millis(70));
    assert_eq!(clock.now(), Duration::from_millis(100));
}

#[test]
fn overrun_skips_sleep_and_does_not_compensate() {
    let clock = ManualClock::new();
    let mut pacer = FramePacer::with_period(Duration::from_millis(100), &clock);

    clock.advance(Duration::from_millis(250));
    assert_eq!(pacer.pace(&clock), Duration::ZERO);

    // The next frame gets a full period again, not a shortened one.
    clock.advance(Duration::from_millis(10));
    assert_eq!(pacer.pace(&clock), Duration::from_millis(90));
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(90)]);
}

#[test]
fn exact_period_elapsed_does_not_sleep() {
    let clock = ManualClock::new();
    let mut pacer = FramePacer::with_period(Duration::from_millis(50), &clock);
    clock.advance(Duration::from_millis(50));
    assert_eq!(pacer.pace(&clock), Duration::ZERO);
    assert!(clock.sleeps().is_empty());
}

#[test]
fn hold_sleeps_whole_periods() {
    let clock = ManualClock::new();
    let fps = crate::foundation::core::Fps::per_second(10).unwrap();
    let mut pacer = FramePacer::new(fps, &clock);
    pacer.hold(3, &clock);
    pacer.hold(0, &clock);
    assert_eq!(clock.total_slept(), Duration::from_millis(300));
    assert_eq!(clock.sleeps().len(), 1);
}

#[test]
fn manual_clock_clones_share_time() {
    let a = ManualClock::new();
    let b = a.clone();
    a.sleep(Duration::from_millis(5));
    assert_eq!(b.now(), Duration::from_millis(5));
    assert_eq!(b.total_slept(), Duration::from_millis(5));
}
