//! Time management utilities

use std::time::{Duration, Instant};

/// Simulated clock of a single world
///
/// Advanced once per tick by the (clamped, time-scaled) delta. Wall time
/// never leaks in here, so replaying the same deltas replays the same clock.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    tick: u64,
    elapsed_sec: f64,
    last_delta_sec: f32,
}

impl TickClock {
    /// Create a clock at tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick
    pub fn advance(&mut self, delta_sec: f32) {
        self.tick += 1;
        self.elapsed_sec += f64::from(delta_sec);
        self.last_delta_sec = delta_sec;
    }

    /// Number of completed ticks
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated seconds
    pub fn elapsed_sec(&self) -> f64 {
        self.elapsed_sec
    }

    /// Delta of the most recent tick
    pub fn last_delta_sec(&self) -> f32 {
        self.last_delta_sec
    }
}

/// Simple stopwatch for measuring elapsed wall time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_ticks_and_time() {
        let mut clock = TickClock::new();
        clock.advance(0.5);
        clock.advance(0.25);

        assert_eq!(clock.tick(), 2);
        assert!((clock.elapsed_sec() - 0.75).abs() < 1e-9);
        assert_eq!(clock.last_delta_sec(), 0.25);
    }

    #[test]
    fn stopped_stopwatch_keeps_elapsed() {
        let mut stopwatch = Stopwatch::start_new();
        assert!(stopwatch.is_running());
        stopwatch.stop();
        let frozen = stopwatch.elapsed();
        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed(), frozen);
    }
}
