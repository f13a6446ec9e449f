//! Blink detection via eye-aspect-ratio
//!
//! EAR = (vertical_1 + vertical_2) / (2 * horizontal), averaged over both
//! eyes. A frame registers a blink when the averaged ratio drops below the
//! threshold and the debounce interval has elapsed since the last blink.

use std::collections::VecDeque;

use landmark_feed::Point2;
use tracing::trace;

use crate::MetricsConfig;

/// EAR reported when eye points are missing (reads as "open", no blink).
pub const NEUTRAL_EAR: f32 = 0.3;

/// Eye-aspect-ratio for a six-point contour
/// (outer, upper x2, inner, lower x2).
///
/// The denominator is floored at 1 to guard degenerate horizontal spans.
pub fn eye_aspect_ratio(contour: Option<[Point2; 6]>) -> f32 {
    let Some(p) = contour else {
        return NEUTRAL_EAR;
    };

    let v1 = p[1].distance(&p[5]);
    let v2 = p[2].distance(&p[4]);
    let h = p[0].distance(&p[3]);

    let denom = 2.0 * h;
    let denom = if denom > 0.0 { denom } else { 1.0 };
    (v1 + v2) / denom
}

/// Debounced blink counter over a trailing window.
///
/// Timestamps in the log are strictly increasing; entries older than the
/// window are purged before every count.
pub struct BlinkDetector {
    log: VecDeque<u64>,
    ear_threshold: f32,
    debounce_ms: u64,
    window_ms: u64,
}

impl BlinkDetector {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            log: VecDeque::new(),
            ear_threshold: config.blink_ear_threshold,
            debounce_ms: config.blink_debounce_ms,
            window_ms: config.blink_window_ms,
        }
    }

    /// Feed one frame's averaged EAR; returns the current blink rate
    /// (count of blinks within the trailing window).
    pub fn update(&mut self, ear: f32, now_ms: u64) -> u32 {
        self.prune(now_ms);

        if ear < self.ear_threshold && self.debounce_elapsed(now_ms) {
            trace!(ear, now_ms, "blink registered");
            self.log.push_back(now_ms);
        }

        self.log.len() as u32
    }

    /// Current blink rate without registering anything.
    pub fn rate(&mut self, now_ms: u64) -> u32 {
        self.prune(now_ms);
        self.log.len() as u32
    }

    /// Timestamp of the most recent registered blink
    pub fn last_blink_ms(&self) -> Option<u64> {
        self.log.back().copied()
    }

    /// Drop all recorded blinks (session stop)
    pub fn reset(&mut self) {
        self.log.clear();
    }

    fn debounce_elapsed(&self, now_ms: u64) -> bool {
        match self.log.back() {
            Some(&last) => now_ms.saturating_sub(last) >= self.debounce_ms,
            None => true,
        }
    }

    fn prune(&mut self, now_ms: u64) {
        while let Some(&front) = self.log.front() {
            if now_ms.saturating_sub(front) >= self.window_ms {
                self.log.pop_front();
            } else {
                break;
            }
        }
    }
}
