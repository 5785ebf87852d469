use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Shape of the path a [`ProgressTracker`] takes from 0 to 1.
///
/// `*In` curves start slow, `*Out` curves start fast, `*InOut` curves ease at
/// both ends. The jitter curves oscillate; the `Stay` variants finish back at
/// 0 instead of 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EasingCurve {
    #[default]
    Linear,
    SineIn,
    SineOut,
    SineInOut,
    CubeIn,
    CubeOut,
    CubeInOut,
    JitterBetweenIn,
    JitterBetweenStay,
    JitterOutsideIn,
    JitterOutsideStay,
}

impl EasingCurve {
    pub const ALL: [EasingCurve; 11] = [
        EasingCurve::Linear,
        EasingCurve::SineIn,
        EasingCurve::SineOut,
        EasingCurve::SineInOut,
        EasingCurve::CubeIn,
        EasingCurve::CubeOut,
        EasingCurve::CubeInOut,
        EasingCurve::JitterBetweenIn,
        EasingCurve::JitterBetweenStay,
        EasingCurve::JitterOutsideIn,
        EasingCurve::JitterOutsideStay,
    ];

    /// Curves that end at 0 rather than 1.
    pub fn is_stay(self) -> bool {
        matches!(
            self,
            EasingCurve::JitterBetweenStay | EasingCurve::JitterOutsideStay
        )
    }

    /// Closed-form value of the curve at progress `p`.
    ///
    /// `jitters` is the number of full sine cycles completed by the jitter
    /// curves; the other curves ignore it.
    pub fn apply(self, p: f64, jitters: u32) -> f64 {
        let cycles = jitters as f64 * 2.0 * PI;
        match self {
            EasingCurve::Linear => p,
            EasingCurve::SineIn => (p * PI / 2.0 + 1.5 * PI).sin() + 1.0,
            EasingCurve::SineOut => (p * PI / 2.0).sin(),
            EasingCurve::SineInOut => (p * PI + 1.5 * PI).sin() * 0.5 + 0.5,
            EasingCurve::CubeIn => p.powi(3),
            EasingCurve::CubeOut => 1.0 + (p - 1.0).powi(3),
            EasingCurve::CubeInOut => {
                if p <= 0.5 {
                    (2.0 * p).powi(3) * 0.5
                } else {
                    (1.0 + ((p - 1.0) * 2.0).powi(3)) * 0.5 + 0.5
                }
            }
            EasingCurve::JitterBetweenIn => (1.5 * PI + (cycles + PI) * p).sin() * 0.5 + 0.5,
            EasingCurve::JitterBetweenStay => (1.5 * PI + cycles * p).sin() * 0.5 + 0.5,
            EasingCurve::JitterOutsideIn => ((cycles + 0.5 * PI) * p).sin(),
            EasingCurve::JitterOutsideStay => (cycles * p).sin(),
        }
    }
}

/// Accumulates time over a fixed duration and reports eased progress.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    curve: EasingCurve,
    duration: f64,
    elapsed: f64,
    jitters: u32,
}

impl ProgressTracker {
    pub fn new(curve: EasingCurve, duration: f64) -> Self {
        let mut tracker = Self {
            curve,
            duration: 0.0,
            elapsed: 0.0,
            jitters: 1,
        };
        tracker.set_duration(duration);
        tracker
    }

    pub fn curve(&self) -> EasingCurve {
        self.curve
    }

    pub fn set_curve(&mut self, curve: EasingCurve) {
        self.curve = curve;
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Negative (and NaN) durations clamp to zero.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration > 0.0 { duration } else { 0.0 };
        self.elapsed = self.elapsed.min(self.duration);
    }

    pub fn set_jitter_count(&mut self, jitters: u32) {
        self.jitters = jitters;
    }

    pub fn advance(&mut self, delta: f64) {
        let next = self.elapsed + delta;
        self.elapsed = if next.is_nan() {
            0.0
        } else {
            next.clamp(0.0, self.duration)
        };
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Un-eased progress. A zero-length tracker reports 0.
    pub fn raw_fraction(&self) -> f64 {
        if self.duration == 0.0 {
            return 0.0;
        }
        self.elapsed / self.duration
    }

    pub fn evaluate(&self) -> f64 {
        if self.elapsed == self.duration {
            if !self.curve.is_stay() {
                return 1.0;
            }
            if self.duration == 0.0 {
                return 0.0;
            }
        } else if self.elapsed == 0.0 {
            return 0.0;
        }

        self.curve.apply(self.raw_fraction(), self.jitters)
    }
}

/// Eased value of a uniform draw `u` over a unit-length tracker.
pub fn shaped_fraction(curve: EasingCurve, u: f64) -> f64 {
    let mut tracker = ProgressTracker::new(curve, 1.0);
    tracker.advance(u);
    tracker.evaluate()
}
