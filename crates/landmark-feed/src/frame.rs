//! Landmark and video frame types

use serde::{Deserialize, Serialize};

use crate::mesh;

/// Side length of the center patch sampled for ambient brightness.
const BRIGHTNESS_PATCH: u32 = 40;

/// A normalized 2D landmark point, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in normalized coordinates.
    pub fn distance(&self, other: &Point2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One sample of facial geometry from the external landmark detector.
///
/// Individual points may be absent (occlusion, partial detection); absence
/// is represented explicitly so downstream estimators can fall back to
/// neutral values instead of crashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Indexed landmark slots; `None` where the detector produced nothing.
    pub points: Vec<Option<Point2>>,
    /// Source frame width in pixels.
    pub width_px: u32,
    /// Source frame height in pixels.
    pub height_px: u32,
    /// Capture timestamp (milliseconds).
    pub timestamp_ms: u64,
}

impl LandmarkFrame {
    /// Create an empty frame with all landmark slots absent.
    pub fn empty(width_px: u32, height_px: u32, timestamp_ms: u64) -> Self {
        Self {
            points: vec![None; mesh::LANDMARK_COUNT],
            width_px,
            height_px,
            timestamp_ms,
        }
    }

    /// Get the landmark at `idx`, if present.
    pub fn point(&self, idx: usize) -> Option<Point2> {
        self.points.get(idx).copied().flatten()
    }

    /// Set the landmark at `idx` (ignored if out of range).
    pub fn set_point(&mut self, idx: usize, point: Point2) {
        if let Some(slot) = self.points.get_mut(idx) {
            *slot = Some(point);
        }
    }

    /// Collect a six-point eye contour. Returns `None` if any point is absent.
    pub fn eye_contour(&self, indices: &[usize; 6]) -> Option<[Point2; 6]> {
        let mut out = [Point2::new(0.0, 0.0); 6];
        for (slot, &idx) in out.iter_mut().zip(indices.iter()) {
            *slot = self.point(idx)?;
        }
        Some(out)
    }

    /// Pixel distance between two landmarks, scaled by frame dimensions.
    pub fn pixel_distance(&self, a: usize, b: usize) -> Option<f32> {
        let pa = self.point(a)?;
        let pb = self.point(b)?;
        let dx = (pa.x - pb.x) * self.width_px as f32;
        let dy = (pa.y - pb.y) * self.height_px as f32;
        Some(dx.hypot(dy))
    }
}

/// Decoded RGB video frame, used only for brightness sampling.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self { data, width, height }
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        if idx + 2 >= self.data.len() {
            return None;
        }
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Estimate ambient brightness in [0, 1] from a center patch.
    ///
    /// Uses the weighted luminance formula 0.299*R + 0.587*G + 0.114*B over
    /// a 40x40 patch at the frame center. Returns 0.5 (neutral) when the
    /// frame is too small or pixel data is incomplete.
    pub fn ambient_brightness(&self) -> f32 {
        if self.width < BRIGHTNESS_PATCH || self.height < BRIGHTNESS_PATCH {
            return 0.5;
        }

        let x0 = (self.width - BRIGHTNESS_PATCH) / 2;
        let y0 = (self.height - BRIGHTNESS_PATCH) / 2;

        let mut sum = 0.0f32;
        let mut count = 0u32;
        for y in y0..y0 + BRIGHTNESS_PATCH {
            for x in x0..x0 + BRIGHTNESS_PATCH {
                if let Some([r, g, b]) = self.get_pixel(x, y) {
                    sum += r as f32 * 0.299 + g as f32 * 0.587 + b as f32 * 0.114;
                    count += 1;
                }
            }
        }

        if count == 0 {
            return 0.5;
        }

        (sum / count as f32 / 255.0).clamp(0.0, 1.0)
    }
}
