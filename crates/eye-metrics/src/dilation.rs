//! Pupil-load proxy from iris and eyelid geometry
//!
//! ratio = iris_width_normalized / eyelid_opening_normalized, with the
//! eyelid opening floored before dividing so a nearly closed eye cannot
//! blow the ratio up. Brightness compensation scales the ratio by
//! (1 + brightness - 0.5) and is a fixed configuration choice, not a
//! per-frame toggle.

use landmark_feed::{mesh, LandmarkFrame};

use crate::MetricsConfig;

/// Raw geometric inputs for the dilation ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrisGeometry {
    /// Horizontal iris width (normalized)
    pub iris_width: f32,
    /// Vertical eyelid opening (normalized)
    pub eyelid_opening: f32,
}

/// Extract iris width and eyelid opening from a landmark frame.
///
/// Returns `None` when any required refined landmark is absent.
pub fn iris_geometry(frame: &LandmarkFrame) -> Option<IrisGeometry> {
    let rim_outer = frame.point(mesh::IRIS_RIM_OUTER)?;
    let rim_inner = frame.point(mesh::IRIS_RIM_INNER)?;
    let upper = frame.point(mesh::UPPER_EYELID)?;
    let lower = frame.point(mesh::LOWER_EYELID)?;

    Some(IrisGeometry {
        iris_width: rim_outer.distance(&rim_inner),
        eyelid_opening: (upper.y - lower.y).abs(),
    })
}

/// Dilation ratio estimator
pub struct DilationEstimator {
    eyelid_floor: f32,
    compensate: bool,
}

impl DilationEstimator {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            eyelid_floor: config.eyelid_opening_floor,
            compensate: config.brightness_compensation,
        }
    }

    /// Compute the pupil-load proxy for one frame.
    ///
    /// `brightness` is the ambient luminance estimate in [0, 1]; it is
    /// ignored when compensation is disabled.
    pub fn estimate(&self, geometry: IrisGeometry, brightness: f32) -> f32 {
        let opening = geometry.eyelid_opening.max(self.eyelid_floor);
        let ratio = geometry.iris_width / opening;

        if self.compensate {
            ratio * (1.0 + brightness - 0.5)
        } else {
            ratio
        }
    }

    pub fn is_compensated(&self) -> bool {
        self.compensate
    }
}
