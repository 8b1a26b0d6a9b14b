// Host-side tests for the clock and frame scheduler, driven by a manual time source.

use ocean_core::*;

fn scheduler() -> (ManualSource, Scheduler<ManualSource>) {
    let source = ManualSource::new();
    let scheduler = Scheduler::with_clock(Clock::with_source(source.clone()));
    (source, scheduler)
}

#[test]
fn ticks_carry_elapsed_and_delta() {
    let (source, mut s) = scheduler();
    let first = s.next_tick().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.elapsed, 0.0);

    source.advance(0.5);
    let second = s.next_tick().unwrap();
    assert_eq!(second.index, 1);
    assert_eq!(second.elapsed, 0.5);
    assert_eq!(second.delta, 0.5);
    assert_eq!(s.frames(), 2);
}

#[test]
fn clock_never_runs_backwards() {
    let source = ManualSource::new();
    source.set(10.0);
    let mut clock = Clock::with_source(source.clone());
    source.set(12.0);
    assert_eq!(clock.elapsed(), 2.0);
    source.set(11.0);
    assert_eq!(clock.elapsed(), 2.0);
    source.set(f64::NAN);
    assert_eq!(clock.elapsed(), 2.0);
}

#[test]
fn stop_token_ends_the_loop() {
    let (_source, mut s) = scheduler();
    let token = s.stop_token();
    assert!(s.next_tick().is_some());
    token.cancel();
    assert!(s.is_stopped());
    assert!(s.next_tick().is_none());
    assert_eq!(s.frames(), 1);
}

#[test]
fn failures_are_counted_not_fatal() {
    let (_source, mut s) = scheduler();
    for i in 0..5 {
        let tick = s.next_tick().unwrap();
        let result: Result<(), String> = if i % 2 == 0 { Err("lost".into()) } else { Ok(()) };
        s.report(&tick, result);
    }
    assert_eq!(s.failed_frames(), 3);
    assert!(s.next_tick().is_some());
}
