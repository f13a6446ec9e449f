//! Viewing distance estimation (pinhole camera model)
//!
//! distance_mm = (REAL_IPD_MM * focal_length_px) / ipd_pixels
//!
//! The camera's focal length in pixels is unknown, so a default derived
//! from a typical 640px-wide ~70 degree FOV webcam is used until a
//! one-time calibration at a known reference distance replaces it.

use tracing::{info, warn};

use crate::{MetricsConfig, MetricsError};

/// Average adult interpupillary distance (mm)
pub const REAL_IPD_MM: f32 = 63.0;

/// Focal length for an uncalibrated ~70 degree FOV 640px-wide webcam:
/// (640 / 2) / tan(35 deg) ~= 457 px
pub const DEFAULT_FOCAL_LENGTH_PX: f32 = 457.0;

/// Clamp band for reported distances (cm)
pub const MIN_DISTANCE_CM: f32 = 15.0;
pub const MAX_DISTANCE_CM: f32 = 200.0;

/// Pinhole-model distance estimator with optional session calibration.
pub struct DistanceEstimator {
    /// Calibrated focal length; `None` falls back to the default.
    focal_length_px: Option<f32>,
    min_ipd_px: f32,
    fallback_cm: f32,
}

impl DistanceEstimator {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            focal_length_px: None,
            min_ipd_px: config.min_ipd_px,
            fallback_cm: config.fallback_distance_cm,
        }
    }

    /// Estimate viewing distance in cm from an inter-pupil pixel distance.
    ///
    /// Sub-threshold or non-finite inputs return the fallback distance;
    /// valid results are clamped into [15, 200] cm to reject transient
    /// detector noise.
    pub fn estimate(&self, ipd_px: f32) -> f32 {
        if !ipd_px.is_finite() || ipd_px < self.min_ipd_px {
            return self.fallback_cm;
        }

        let distance_mm = REAL_IPD_MM * self.focal_length() / ipd_px;
        (distance_mm / 10.0).clamp(MIN_DISTANCE_CM, MAX_DISTANCE_CM)
    }

    /// Solve the pinhole formula for focal length at a known distance and
    /// store it for the rest of the session.
    ///
    /// Fails without touching state when the observed sample is invalid.
    pub fn calibrate(&mut self, ipd_px: f32, known_distance_cm: f32) -> Result<f32, MetricsError> {
        if !ipd_px.is_finite() || ipd_px < self.min_ipd_px {
            warn!(ipd_px, "calibration rejected: no valid inter-pupil sample");
            return Err(MetricsError::NoCalibrationSample);
        }
        if known_distance_cm <= 0.0 {
            return Err(MetricsError::InvalidReferenceDistance);
        }

        if self.focal_length_px.is_some() {
            warn!("re-calibrating an already calibrated session");
        }

        let focal = ipd_px * known_distance_cm * 10.0 / REAL_IPD_MM;
        self.focal_length_px = Some(focal);
        info!(focal_length_px = focal, "distance calibration stored");
        Ok(focal)
    }

    /// Effective focal length (calibrated or default)
    pub fn focal_length(&self) -> f32 {
        self.focal_length_px.unwrap_or(DEFAULT_FOCAL_LENGTH_PX)
    }

    pub fn is_calibrated(&self) -> bool {
        self.focal_length_px.is_some()
    }

    /// Discard session calibration
    pub fn reset(&mut self) {
        self.focal_length_px = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn estimator() -> DistanceEstimator {
        DistanceEstimator::new(&MetricsConfig::default())
    }

    #[test]
    fn test_default_focal_concrete_distance() {
        // ipd 40px at 457px focal: (63 * 457) / 40 / 10 ~= 71.98 cm
        let d = estimator().estimate(40.0);
        assert!((d - 71.98).abs() < 0.1);
        // lands in the 50-80 cm optimal band
        assert!((50.0..=80.0).contains(&d));
    }

    #[test]
    fn test_tiny_ipd_returns_fallback() {
        let est = estimator();
        assert_eq!(est.estimate(0.0), 60.0);
        assert_eq!(est.estimate(1.9), 60.0);
        assert_eq!(est.estimate(f32::NAN), 60.0);
    }

    #[test]
    fn test_clamped_to_band() {
        let est = estimator();
        // Huge ipd -> very close -> clamped at 15
        assert_eq!(est.estimate(10_000.0), MIN_DISTANCE_CM);
        // Tiny-but-valid ipd -> very far -> clamped at 200
        assert_eq!(est.estimate(2.0), MAX_DISTANCE_CM);
    }

    #[test]
    fn test_calibration_rejected_without_sample() {
        let mut est = estimator();
        assert!(est.calibrate(0.5, 60.0).is_err());
        assert!(est.calibrate(40.0, 0.0).is_err());
        assert!(!est.is_calibrated());
        assert_eq!(est.focal_length(), DEFAULT_FOCAL_LENGTH_PX);
    }

    #[test]
    fn test_reset_discards_calibration() {
        let mut est = estimator();
        est.calibrate(40.0, 60.0).unwrap();
        assert!(est.is_calibrated());
        est.reset();
        assert!(!est.is_calibrated());
    }

    proptest! {
        #[test]
        fn prop_distance_monotonically_decreasing(
            ipd1 in 2.0f32..500.0,
            ipd2 in 2.0f32..500.0,
        ) {
            prop_assume!(ipd1 < ipd2);
            let est = estimator();
            prop_assert!(est.estimate(ipd1) >= est.estimate(ipd2));
        }

        #[test]
        fn prop_distance_always_in_band(ipd in prop::num::f32::ANY) {
            let d = estimator().estimate(ipd);
            prop_assert!((MIN_DISTANCE_CM..=MAX_DISTANCE_CM).contains(&d) || d == 60.0);
        }

        #[test]
        fn prop_calibration_round_trip(
            ipd in 5.0f32..400.0,
            reference_cm in 20.0f32..150.0,
        ) {
            let mut est = estimator();
            est.calibrate(ipd, reference_cm).unwrap();
            let d = est.estimate(ipd);
            prop_assert!((d - reference_cm).abs() < 0.01 * reference_cm);
        }
    }
}
