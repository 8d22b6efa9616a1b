// Frame timing
//
// The core runs on a fixed timestep driven by an external clock. Each
// simulation step receives a FrameTime: the step's delta plus the
// cumulative elapsed time since the session started.

use std::time::Duration;

/// Default simulation rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of simulation steps per real frame to prevent spiral of death
const MAX_STEPS: u32 = 5;

/// Per-step time values handed to every update call
#[derive(Debug, Clone, Copy)]
pub struct FrameTime {
    /// Time advanced by this step, in seconds
    pub delta: f32,
    /// Cumulative simulation time since session start, in seconds
    pub total: f64,
}

impl FrameTime {
    pub fn new(delta: f32, total: f64) -> Self {
        Self { delta, total }
    }
}

/// Fixed-timestep clock driving the simulation
pub struct FrameClock {
    step: f32,
    accumulator: Duration,
    total: f64,
    step_count: u64,
}

impl FrameClock {
    /// Create a clock ticking at the given step length (seconds)
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            total: 0.0,
            step_count: 0,
        }
    }

    /// Accumulate real elapsed time, returns the number of fixed steps to run
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let step = Duration::from_secs_f32(self.step);

        let mut steps = 0;
        while self.accumulator >= step && steps < MAX_STEPS {
            self.accumulator -= step;
            steps += 1;
        }
        steps
    }

    /// Advance the simulation by one fixed step
    pub fn tick(&mut self) -> FrameTime {
        self.total += f64::from(self.step);
        self.step_count += 1;
        FrameTime::new(self.step, self.total)
    }

    /// Fixed step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Cumulative simulation time in seconds
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Total number of steps executed
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FIXED_TIMESTEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = FrameClock::default();
        assert_eq!(clock.step_count(), 0);
        assert_eq!(clock.total(), 0.0);
        assert_eq!(clock.step(), FIXED_TIMESTEP);
    }

    #[test]
    fn test_tick_accumulates_total() {
        let mut clock = FrameClock::new(0.1);
        let first = clock.tick();
        let second = clock.tick();
        assert_eq!(first.delta, 0.1);
        assert!((second.total - 0.2).abs() < 1e-6);
        assert_eq!(clock.step_count(), 2);
    }

    #[test]
    fn test_advance_counts_steps() {
        let mut clock = FrameClock::new(0.01);
        let steps = clock.advance(Duration::from_millis(35));
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_advance_caps_steps() {
        let mut clock = FrameClock::new(0.001);
        // 300ms would allow 300 steps, but the cap applies
        let steps = clock.advance(Duration::from_millis(300));
        assert_eq!(steps, 5);
    }
}
