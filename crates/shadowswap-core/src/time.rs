use std::time::Duration;

/// Accumulator-based fixed timestep.
///
/// Real elapsed time is fed in once per rendered frame; the caller runs one
/// simulation step per returned tick. Catch-up is capped so a long stall
/// (terminal resize, debugger) does not replay seconds of gameplay at once.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(tick_rate_hz: f32, max_steps: u32) -> Self {
        let hz = if tick_rate_hz.is_finite() && tick_rate_hz > 0.0 {
            tick_rate_hz
        } else {
            60.0
        };
        Self {
            step: Duration::from_secs_f64(1.0 / hz as f64),
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add `elapsed` and return how many fixed steps are due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            tracing::debug!(
                dropped_ms = self.accumulator.as_millis() as u64,
                "Simulation fell behind, dropping accumulated time"
            );
            self.accumulator = Duration::ZERO;
        }
        steps
    }

    /// Time left until the next step is due.
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_per_period() {
        let mut clock = FixedTimestep::new(60.0, 5);
        assert_eq!(clock.advance(clock.step()), 1);
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }

    #[test]
    fn partial_period_accumulates() {
        let mut clock = FixedTimestep::new(60.0, 5);
        let half = clock.step() / 2;
        assert_eq!(clock.advance(half), 0);
        assert_eq!(clock.advance(half + Duration::from_micros(1)), 1);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut clock = FixedTimestep::new(60.0, 3);
        assert_eq!(clock.advance(Duration::from_secs(2)), 3);
        // Backlog was discarded
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }

    #[test]
    fn one_second_yields_sixty_steps() {
        let mut clock = FixedTimestep::new(60.0, 1);
        let mut total = 0;
        for _ in 0..1000 {
            total += clock.advance(Duration::from_millis(1));
        }
        assert!((59..=60).contains(&total), "got {total} steps");
    }

    #[test]
    fn invalid_rate_falls_back_to_sixty() {
        let clock = FixedTimestep::new(0.0, 1);
        assert_eq!(clock.step(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn until_next_shrinks_as_time_accumulates() {
        let mut clock = FixedTimestep::new(60.0, 5);
        let full = clock.until_next();
        clock.advance(Duration::from_millis(5));
        assert!(clock.until_next() < full);
    }
}
