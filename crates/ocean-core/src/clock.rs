use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;

/// Raw seconds from some fixed origin. May be noisy; `Clock` smooths out
/// backwards steps.
pub trait TimeSource {
    fn seconds(&self) -> f64;
}

/// Wall time via `instant` (`performance.now()` on wasm).
pub struct InstantSource {
    origin: Instant,
}

impl Default for InstantSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for InstantSource {
    fn seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven time for tests and offline rendering. Clones share the value.
#[derive(Clone, Default)]
pub struct ManualSource {
    now: Rc<Cell<f64>>,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl TimeSource for ManualSource {
    fn seconds(&self) -> f64 {
        self.now.get()
    }
}

/// Monotonic elapsed time since construction.
pub struct Clock<S: TimeSource = InstantSource> {
    source: S,
    start: f64,
    last: f64,
}

impl Clock<InstantSource> {
    pub fn start() -> Self {
        Self::with_source(InstantSource::default())
    }
}

impl<S: TimeSource> Clock<S> {
    pub fn with_source(source: S) -> Self {
        let start = source.seconds();
        Self {
            source,
            start,
            last: 0.0,
        }
    }

    /// Seconds since start; never smaller than a previous reading.
    pub fn elapsed(&mut self) -> f32 {
        let now = self.source.seconds() - self.start;
        if now.is_finite() && now > self.last {
            self.last = now;
        }
        self.last as f32
    }
}
