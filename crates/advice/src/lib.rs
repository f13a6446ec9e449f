//! Advice Provider Boundary
//!
//! Advice text generation is an external concern; this crate defines the
//! interface the pipeline consumes plus the mandatory local fallback used
//! whenever the provider is unavailable or errors. The fallback rotates
//! through hard-coded tips and is context-aware on low blink rate,
//! too-close distance, and high fatigue.

use std::sync::atomic::{AtomicUsize, Ordering};

use eye_metrics::{DistanceBand, MetricsSnapshot};
use thiserror::Error;
use tracing::debug;

/// Advice error types
#[derive(Error, Debug)]
pub enum AdviceError {
    #[error("advice provider unavailable: {0}")]
    Unavailable(String),

    #[error("advice provider returned an empty response")]
    EmptyResponse,
}

/// External advice text source.
///
/// Called off the frame path on a fixed interval; implementations may
/// block internally (the caller invokes them on a blocking task).
pub trait AdviceProvider: Send + Sync {
    fn get_advice(&self, snapshot: &MetricsSnapshot) -> Result<String, AdviceError>;
}

const GENERAL_TIPS: [&str; 6] = [
    "Follow the 20-20-20 rule: every 20 minutes, look 20 feet away for 20 seconds.",
    "Adjust your screen brightness to match the room around you.",
    "Position the top of your monitor at or slightly below eye level.",
    "Consciously blink a few times to refresh your tear film.",
    "Keep your screen about an arm's length away.",
    "A few slow, deep breaths relax the muscles around your eyes too.",
];

const LOW_BLINK_TIPS: [&str; 3] = [
    "You're blinking less than usual. Close your eyes for a couple of seconds.",
    "Low blink rate detected. Try a round of slow, deliberate blinks.",
    "Staring without blinking dries your eyes out. Blink!",
];

const TOO_CLOSE_TIPS: [&str; 3] = [
    "You're leaning in close. Sit back and let your eyes focus farther away.",
    "Screen too close. Push your chair back to at least arm's length.",
    "Ease off the screen a little. Your eyes focus more comfortably at 50-80 cm.",
];

const FATIGUE_TIPS: [&str; 3] = [
    "Your fatigue score is climbing. A short break now beats a headache later.",
    "Eyes showing real strain. Step away from the screen for a few minutes.",
    "High fatigue detected. Look out a window and let your eyes rest.",
];

/// Deterministic local tips: the guaranteed fallback provider.
///
/// Tip selection rotates through a fixed list chosen by the most pressing
/// signal in the snapshot, so repeated calls with the same state still
/// vary the wording predictably.
#[derive(Debug, Default)]
pub struct LocalTips {
    cursor: AtomicUsize,
}

impl LocalTips {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the next tip for this snapshot.
    pub fn pick(&self, snapshot: &MetricsSnapshot) -> &'static str {
        let n = self.cursor.fetch_add(1, Ordering::Relaxed);

        if snapshot.fatigue >= 70 {
            FATIGUE_TIPS[n % FATIGUE_TIPS.len()]
        } else if snapshot.distance_band() == DistanceBand::TooClose {
            TOO_CLOSE_TIPS[n % TOO_CLOSE_TIPS.len()]
        } else if snapshot.blink_rate > 0 && snapshot.blink_rate < 8 {
            LOW_BLINK_TIPS[n % LOW_BLINK_TIPS.len()]
        } else {
            GENERAL_TIPS[n % GENERAL_TIPS.len()]
        }
    }
}

impl AdviceProvider for LocalTips {
    fn get_advice(&self, snapshot: &MetricsSnapshot) -> Result<String, AdviceError> {
        let tip = self.pick(snapshot);
        debug!(fatigue = snapshot.fatigue, "serving local tip");
        Ok(tip.to_string())
    }
}
