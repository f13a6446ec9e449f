//! Eye Metrics
//!
//! Per-frame biometric indicators from facial landmarks:
//! - Eye-aspect-ratio and debounced blink rate
//! - Viewing distance via the pinhole camera model
//! - Pupil-load proxy (iris/eyelid ratio, optionally brightness-compensated)
//! - Temporally smoothed fatigue score

pub mod blink;
pub mod config;
pub mod dilation;
pub mod distance;
pub mod fatigue;

pub use blink::{eye_aspect_ratio, BlinkDetector};
pub use config::MetricsConfig;
pub use dilation::{iris_geometry, DilationEstimator, IrisGeometry};
pub use distance::DistanceEstimator;
pub use fatigue::{FatigueInputs, FatigueScorer};

use landmark_feed::{mesh, LandmarkFrame};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metrics error types
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("calibration failed: no valid inter-pupil sample available")]
    NoCalibrationSample,

    #[error("calibration failed: reference distance must be positive")]
    InvalidReferenceDistance,
}

/// Viewing-distance band relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceBand {
    /// Under 40 cm, alert-worthy
    TooClose,
    /// 40-50 cm, closer than ideal
    Near,
    /// 50-80 cm, the recommended band
    Optimal,
    /// Over 80 cm
    Far,
}

/// One frame's worth of derived biometric indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Whether a face was visible on the most recent frame
    pub face_detected: bool,
    /// Instantaneous eye-aspect-ratio (diagnostics)
    pub ear: f32,
    /// Blinks in the trailing 60 s window
    pub blink_rate: u32,
    /// Estimated viewing distance (cm)
    pub distance_cm: f32,
    /// Pupil-load proxy
    pub dilation: f32,
    /// Head tilt from vertical (degrees)
    pub tilt_degrees: f32,
    /// Ambient brightness estimate in [0, 1]
    pub brightness: f32,
    /// Smoothed fatigue score, integer in [0, 100]
    pub fatigue: u8,
    /// Elapsed session time (seconds)
    pub session_seconds: u64,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            face_detected: false,
            ear: 0.3,
            blink_rate: 0,
            distance_cm: 60.0,
            dilation: 0.0,
            tilt_degrees: 0.0,
            brightness: 0.5,
            fatigue: 0,
            session_seconds: 0,
        }
    }
}

impl MetricsSnapshot {
    /// Classify the current viewing distance.
    pub fn distance_band(&self) -> DistanceBand {
        if self.distance_cm < 40.0 {
            DistanceBand::TooClose
        } else if self.distance_cm < 50.0 {
            DistanceBand::Near
        } else if self.distance_cm <= 80.0 {
            DistanceBand::Optimal
        } else {
            DistanceBand::Far
        }
    }
}

/// Head tilt in degrees from vertical, taken from the forehead-chin axis.
///
/// Zero for an upright head (chin directly below forehead in image
/// coordinates), positive when tilted toward the subject's right.
/// Returns `None` when either reference point is absent.
pub fn head_tilt_degrees(frame: &LandmarkFrame) -> Option<f32> {
    let top = frame.point(mesh::FOREHEAD)?;
    let chin = frame.point(mesh::CHIN)?;
    Some((top.x - chin.x).atan2(chin.y - top.y).to_degrees())
}
