/// Elapsed time between two scheduler ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeStep {
    step_ms: f64,
    last_ms: f64,
}

impl TimeStep {
    pub fn new(initial_ms: f64) -> Self {
        Self {
            step_ms: 0.0,
            last_ms: initial_ms,
        }
    }

    /// Advance to `now_ms`; the step becomes `now_ms - previous`.
    pub fn update(&mut self, now_ms: f64) {
        self.step_ms = now_ms - self.last_ms;
        self.last_ms = now_ms;
    }

    #[inline]
    pub fn millis(&self) -> f64 {
        self.step_ms
    }

    #[inline]
    pub fn seconds(&self) -> f64 {
        self.step_ms * 0.001
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_tracks_last_tick() {
        let mut t = TimeStep::new(1000.0);
        assert_eq!(t.millis(), 0.0);
        t.update(1016.0);
        assert_eq!(t.millis(), 16.0);
        t.update(1050.0);
        assert_eq!(t.millis(), 34.0);
        assert!((t.seconds() - 0.034).abs() < 1e-12);
    }
}
