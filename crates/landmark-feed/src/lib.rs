//! Landmark Feed
//!
//! Input types for the eye-strain monitoring pipeline:
//! - Normalized facial landmark frames from an external detector
//! - Raw RGB video frames for ambient brightness sampling
//! - Face mesh index constants used by the metric estimators

pub mod frame;
pub mod mesh;

pub use frame::{LandmarkFrame, Point2, VideoFrame};
