use crate::clock::{Clock, InstantSource, TimeSource};
use crate::constants::FRAME_ERROR_LOG_EVERY;
use std::cell::Cell;
use std::fmt::Display;
use std::rc::Rc;

/// Cooperative cancellation shared between the frame loop and its owner.
#[derive(Clone, Default, Debug)]
pub struct StopToken {
    stopped: Rc<Cell<bool>>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.stopped.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.get()
    }
}

/// One iteration of the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    pub index: u64,
    pub elapsed: f32,
    /// Seconds since the previous tick. Nothing consumes it yet.
    pub delta: f32,
}

/// Hands out frame ticks until stopped and keeps per-frame failure counts.
pub struct Scheduler<S: TimeSource = InstantSource> {
    clock: Clock<S>,
    stop: StopToken,
    previous: f32,
    frames: u64,
    failed_frames: u64,
}

impl Scheduler<InstantSource> {
    pub fn start() -> Self {
        Self::with_clock(Clock::start())
    }
}

impl<S: TimeSource> Scheduler<S> {
    pub fn with_clock(clock: Clock<S>) -> Self {
        Self {
            clock,
            stop: StopToken::new(),
            previous: 0.0,
            frames: 0,
            failed_frames: 0,
        }
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// The next tick, or `None` once the stop token is cancelled.
    pub fn next_tick(&mut self) -> Option<FrameTick> {
        if self.stop.is_cancelled() {
            return None;
        }
        let elapsed = self.clock.elapsed();
        let tick = FrameTick {
            index: self.frames,
            elapsed,
            delta: elapsed - self.previous,
        };
        self.previous = elapsed;
        self.frames += 1;
        Some(tick)
    }

    /// Record how a frame went. Failures are logged and counted, never fatal.
    pub fn report<E: Display>(&mut self, tick: &FrameTick, result: Result<(), E>) {
        if let Err(e) = result {
            self.failed_frames += 1;
            if self.failed_frames == 1 || self.failed_frames % FRAME_ERROR_LOG_EVERY == 0 {
                log::warn!(
                    "[frame {}] render failed ({} failed so far): {}",
                    tick.index,
                    self.failed_frames,
                    e
                );
            }
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }
}
