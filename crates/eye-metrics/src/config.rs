//! Metrics configuration

use serde::{Deserialize, Serialize};

/// Configuration for the per-frame metric estimators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Averaged EAR below this registers a blink
    pub blink_ear_threshold: f32,

    /// Minimum gap between registered blinks (milliseconds)
    pub blink_debounce_ms: u64,

    /// Trailing window over which blink rate is counted (milliseconds)
    pub blink_window_ms: u64,

    /// Inter-pupil distances below this many pixels are treated as noise
    pub min_ipd_px: f32,

    /// Distance reported when no valid inter-pupil sample exists (cm)
    pub fallback_distance_cm: f32,

    /// Reference distance assumed during calibration (cm)
    pub calibration_distance_cm: f32,

    /// Floor applied to eyelid opening before the dilation division
    pub eyelid_opening_floor: f32,

    /// Scale the dilation ratio by ambient brightness.
    ///
    /// Enabled by default; disabling it lowers absolute dilation values,
    /// so the fatigue thresholds assume it stays on.
    pub brightness_compensation: bool,

    /// Exponential smoothing factor for the fatigue score
    pub smoothing_alpha: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            blink_ear_threshold: 0.22,
            blink_debounce_ms: 300,
            blink_window_ms: 60_000,
            min_ipd_px: 2.0,
            fallback_distance_cm: 60.0,
            calibration_distance_cm: 60.0,
            eyelid_opening_floor: 0.005,
            brightness_compensation: true,
            smoothing_alpha: 0.15,
        }
    }
}

impl MetricsConfig {
    /// Config with brightness compensation disabled (raw dilation ratio)
    pub fn uncompensated() -> Self {
        Self {
            brightness_compensation: false,
            ..Default::default()
        }
    }
}
