// tethys_sim/src/simulation/core/clock.rs

use bevy_ecs::prelude::{ResMut, Resource};
use std::time::Duration;

/// Per-tick snapshot handed to every `SimSystem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateInfo {
    /// Simulation time at the end of this tick.
    pub sim_time: Duration,
    pub dt: Duration,
    pub iterations: u64,
    pub paused: bool,
}

/// The host's simulation clock. One `App::update` is one tick.
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    sim_time: Duration,
    step_size: Duration,
    iterations: u64,
    paused: bool,
}

impl SimClock {
    pub fn new(step_size: Duration) -> Self {
        Self {
            sim_time: Duration::ZERO,
            step_size,
            iterations: 0,
            paused: false,
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn step_size(&self) -> Duration {
        self.step_size
    }

    pub fn info(&self) -> UpdateInfo {
        UpdateInfo {
            sim_time: self.sim_time,
            dt: if self.paused { Duration::ZERO } else { self.step_size },
            iterations: self.iterations,
            paused: self.paused,
        }
    }

    fn advance(&mut self) {
        if self.paused {
            return;
        }
        self.sim_time += self.step_size;
        self.iterations += 1;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(10))
    }
}

/// Runs in `First`, before any plugin sees the tick.
pub fn advance_sim_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_steps() {
        let mut clock = SimClock::new(Duration::from_millis(250));
        for _ in 0..5 {
            clock.advance();
        }
        let info = clock.info();
        assert_eq!(info.sim_time, Duration::from_millis(1250));
        assert_eq!(info.iterations, 5);
        assert_eq!(info.dt, Duration::from_millis(250));
    }

    #[test]
    fn paused_clock_stands_still() {
        let mut clock = SimClock::new(Duration::from_millis(250));
        clock.advance();
        clock.set_paused(true);
        clock.advance();
        let info = clock.info();
        assert_eq!(info.sim_time, Duration::from_millis(250));
        assert!(info.paused);
        assert_eq!(info.dt, Duration::ZERO);
    }
}
