/// Scales wall-clock deltas before they reach the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationClock {
    time_scale: f64,
    scale_at_pause: Option<f64>,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            scale_at_pause: None,
        }
    }
}

impl SimulationClock {
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.scale_at_pause.is_some()
    }

    pub fn pause(&mut self) {
        if self.scale_at_pause.is_none() {
            self.scale_at_pause = Some(self.time_scale);
            self.time_scale = 0.0;
        }
    }

    /// Restores the speed that was active when the clock was paused.
    pub fn resume(&mut self) {
        if let Some(scale) = self.scale_at_pause.take() {
            self.time_scale = scale;
        }
    }

    /// Negative or non-finite speeds are treated as a stop.
    pub fn set_speed(&mut self, speed: f64) {
        self.scale_at_pause = None;
        self.time_scale = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            0.0
        };
    }

    pub fn reset_speed(&mut self) {
        self.set_speed(1.0);
    }

    pub fn scaled(&self, delta: f64) -> f64 {
        delta * self.time_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_and_resume_restore_speed() {
        let mut clock = SimulationClock::default();
        clock.set_speed(3.0);
        clock.pause();
        assert!(clock.is_paused());
        assert_eq!(clock.scaled(2.0), 0.0);

        // A second pause must not overwrite the saved speed.
        clock.pause();
        clock.resume();
        assert!(!clock.is_paused());
        assert_eq!(clock.scaled(2.0), 6.0);
    }

    #[test]
    fn invalid_speeds_stop_the_clock() {
        let mut clock = SimulationClock::default();
        clock.set_speed(-2.0);
        assert_eq!(clock.time_scale(), 0.0);
        clock.set_speed(f64::NAN);
        assert_eq!(clock.time_scale(), 0.0);
        clock.reset_speed();
        assert_eq!(clock.time_scale(), 1.0);
    }
}
