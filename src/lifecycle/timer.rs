use crate::error::{Error, Result};

/// Accumulates frame time and fires once it reaches an interval. Firing resets
/// the accumulator to zero; time past the interval is dropped.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SpawnTimer {
    accumulated: f32,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.;
    }

    /// Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, delta: f32, interval: f32) -> Result<bool> {
        if !(interval.is_finite() && interval > 0.) {
            return Err(Error::configuration(format!(
                "spawn interval must be finite and positive, got {}",
                interval
            )));
        }

        if delta.is_finite() && delta > 0. {
            self.accumulated += delta;
        }

        if self.accumulated >= interval {
            self.accumulated = 0.;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_third_step_and_drops_remainder() {
        let mut timer = SpawnTimer::new();
        assert!(!timer.tick(0.4, 1.0).unwrap());
        assert!(!timer.tick(0.4, 1.0).unwrap());
        assert!(timer.tick(0.4, 1.0).unwrap());
        assert_eq!(timer.accumulated(), 0.);
    }

    #[test]
    fn negative_delta_never_drains() {
        let mut timer = SpawnTimer::new();
        timer.tick(0.5, 1.0).unwrap();
        timer.tick(-3.0, 1.0).unwrap();
        timer.tick(f32::NAN, 1.0).unwrap();
        assert_eq!(timer.accumulated(), 0.5);
    }

    #[test]
    fn invalid_interval_is_rejected() {
        let mut timer = SpawnTimer::new();
        assert!(timer.tick(0.1, 0.).is_err());
        assert!(timer.tick(0.1, -1.).is_err());
        assert!(timer.tick(0.1, f32::INFINITY).is_err());
        assert_eq!(timer.accumulated(), 0.);
    }
}
