//! Face mesh index constants
//!
//! Indices into the 478-point refined face mesh produced by the external
//! landmark detector. Point ordering within each eye contour is fixed:
//! outer corner, two upper-lid points, inner corner, two lower-lid points.

/// Total number of landmark slots in a refined mesh frame.
pub const LANDMARK_COUNT: usize = 478;

/// Left eye contour (outer, upper x2, inner, lower x2).
pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// Right eye contour (outer, upper x2, inner, lower x2).
pub const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];

/// Left iris center (refined landmarks only).
pub const LEFT_IRIS_CENTER: usize = 468;

/// Right iris center (refined landmarks only).
pub const RIGHT_IRIS_CENTER: usize = 473;

/// Horizontal extremes of the left iris rim, used for iris width.
pub const IRIS_RIM_OUTER: usize = 469;
pub const IRIS_RIM_INNER: usize = 471;

/// Upper and lower eyelid midpoints, used for eyelid opening.
pub const UPPER_EYELID: usize = 159;
pub const LOWER_EYELID: usize = 145;

/// Forehead and chin reference points, used for head tilt.
pub const FOREHEAD: usize = 10;
pub const CHIN: usize = 152;
