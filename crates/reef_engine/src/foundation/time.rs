//! Time management utilities

use std::time::Instant;

/// High-precision frame clock with a minimum tick interval
///
/// The simulation is frame-stepped: [`FrameClock::try_tick`] returns the
/// elapsed time only once at least `min_interval` seconds of wall time have
/// passed since the previous tick, which gates the whole update pipeline.
pub struct FrameClock {
    last_tick: Instant,
    min_interval: f32,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a new clock with the given minimum tick interval in seconds
    pub fn new(min_interval: f32) -> Self {
        Self {
            last_tick: Instant::now(),
            min_interval,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the clock if enough wall time has elapsed
    ///
    /// Returns `Some(delta_seconds)` when a simulation tick should run,
    /// `None` when the caller should keep polling.
    pub fn try_tick(&mut self) -> Option<f32> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick).as_secs_f32();
        if elapsed < self.min_interval {
            return None;
        }
        self.last_tick = now;
        self.delta_time = elapsed;
        self.total_time += elapsed;
        self.frame_count += 1;
        Some(elapsed)
    }

    /// Get the time consumed by the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time since clock creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the number of ticks taken so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
