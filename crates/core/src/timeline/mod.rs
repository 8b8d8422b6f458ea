use serde::{Deserialize, Serialize};

/// Read-only view of the audio transport's position.
pub trait PlaybackClock {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
}

/// Clock driven by hand. The command line player and the tests advance it
/// frame by frame and jump it around to emulate seeks.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualClock {
    pub time_seconds: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(time_seconds: f64) -> Self {
        Self { time_seconds }
    }

    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    pub fn advance(&mut self, delta: f64) {
        self.time_seconds = (self.time_seconds + delta).max(0.0);
    }

    pub fn seek(&mut self, time_seconds: f64) {
        self.time_seconds = time_seconds.max(0.0);
    }
}

impl PlaybackClock for ManualClock {
    fn current_time(&self) -> f64 {
        self.time_seconds
    }
}

impl<C: PlaybackClock + ?Sized> PlaybackClock for &C {
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_runs_before_zero() {
        let mut clock = ManualClock::at(1.0);
        clock.advance(-5.0);
        assert_eq!(clock.current_time(), 0.0);
        clock.seek(-3.0);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn seeks_jump_directly() {
        let mut clock = ManualClock::new();
        clock.advance(0.25);
        clock.seek(42.0);
        assert_eq!(clock.current_time(), 42.0);
        clock.reset();
        assert_eq!(clock.current_time(), 0.0);
    }
}
