//! Fatigue scoring
//!
//! A raw score in [0, 100] is summed from independent bucketed
//! contributions (blink rate, distance, head tilt, dilation, session
//! duration), then passed through exponential smoothing so the reported
//! score moves gradually instead of jumping frame to frame.

use serde::{Deserialize, Serialize};

use crate::MetricsConfig;

/// Instantaneous inputs to the fatigue score
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FatigueInputs {
    /// Blinks in the trailing 60 s window (0 = no data yet)
    pub blink_rate: u32,
    /// Viewing distance (cm)
    pub distance_cm: f32,
    /// Head tilt from vertical (degrees, sign ignored)
    pub tilt_degrees: f32,
    /// Pupil-load proxy
    pub dilation: f32,
    /// Elapsed session time (seconds)
    pub session_seconds: u64,
}

/// Fatigue scorer with per-session EMA state.
///
/// The smoothing state is owned here explicitly; there is no hidden
/// module-level accumulator, so resetting a session resets the score.
pub struct FatigueScorer {
    alpha: f32,
    smoothed: f32,
}

impl FatigueScorer {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            alpha: config.smoothing_alpha,
            smoothed: 0.0,
        }
    }

    /// Un-smoothed bucketed score, clamped to [0, 100].
    pub fn raw_score(inputs: &FatigueInputs) -> u8 {
        let mut raw = 0u32;

        // Blink rate: healthy is 15-20 per minute. A rate of zero means
        // no blinks observed yet, which is neutral, not alarming.
        if inputs.blink_rate > 0 {
            if inputs.blink_rate < 8 {
                raw += 30;
            } else if inputs.blink_rate < 12 {
                raw += 18;
            } else if inputs.blink_rate < 15 {
                raw += 8;
            }
        }

        // Screen distance: penalize close work hardest, far-squint a little
        if inputs.distance_cm < 35.0 {
            raw += 35;
        } else if inputs.distance_cm < 45.0 {
            raw += 22;
        } else if inputs.distance_cm < 50.0 {
            raw += 12;
        } else if inputs.distance_cm > 90.0 {
            raw += 8;
        }

        // Head tilt: slight tilt is normal posture
        let tilt = inputs.tilt_degrees.abs();
        if tilt > 20.0 {
            raw += 15;
        } else if tilt > 12.0 {
            raw += 8;
        }

        // Dilation proxy: typical resting value is ~0.15-0.25
        if inputs.dilation > 0.32 {
            raw += 20;
        } else if inputs.dilation > 0.27 {
            raw += 10;
        } else if inputs.dilation < 0.10 {
            raw += 5;
        }

        // Session duration: eyes fatigue over time regardless of signals
        if inputs.session_seconds > 5400 {
            raw += 20;
        } else if inputs.session_seconds > 3600 {
            raw += 13;
        } else if inputs.session_seconds > 1800 {
            raw += 6;
        }

        raw.min(100) as u8
    }

    /// Score one frame: bucketed raw value folded into the EMA.
    ///
    /// smoothed = alpha * raw + (1 - alpha) * smoothed_prev
    pub fn update(&mut self, inputs: &FatigueInputs) -> u8 {
        let raw = Self::raw_score(inputs) as f32;
        self.smoothed = self.alpha * raw + (1.0 - self.alpha) * self.smoothed;
        self.smoothed.round() as u8
    }

    /// Current smoothed score without feeding a new frame
    pub fn current(&self) -> u8 {
        self.smoothed.round() as u8
    }

    /// Reset smoothing state (session start/stop)
    pub fn reset(&mut self) {
        self.smoothed = 0.0;
    }
}
