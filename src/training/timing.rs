//! Wall-clock timing of fit and predict calls

use std::time::Instant;

/// Run `f` and measure how long it took, in seconds.
///
/// The closure's return value is handed back untouched, so a failed fit
/// still propagates its error; the caller just drops the duration.
pub fn timed<T, F>(f: F) -> (T, f64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64())
}

/// Running total of measured durations. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElapsedTime {
    seconds: f64,
}

impl ElapsedTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a duration; negative or NaN inputs count as zero
    pub fn add(&mut self, seconds: f64) {
        if seconds > 0.0 {
            self.seconds += seconds;
        }
    }

    /// Add everything accumulated by another timer
    pub fn absorb(&mut self, other: ElapsedTime) {
        self.add(other.seconds);
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}
