//! Best-effort voice dispatch
//!
//! The speech engine is injected through `VoiceSink` so the dispatcher is
//! testable without one. Dispatch policy is skip-if-busy: a new utterance
//! is dropped while one is in progress. The dispatcher keeps its own
//! per-key cooldowns, so toggling the channel off and on cannot bypass
//! rate limiting.

use std::sync::Arc;

use tracing::debug;

use crate::CooldownRegistry;

/// External text-to-speech engine boundary.
///
/// `speak` must hand the utterance off without blocking; completion is
/// observable only through `is_busy`.
pub trait VoiceSink: Send + Sync {
    fn speak(&self, text: &str);
    fn stop(&self);
    fn is_busy(&self) -> bool;
}

/// No-op sink used when no speech engine is available.
#[derive(Debug, Default)]
pub struct NullVoice;

impl VoiceSink for NullVoice {
    fn speak(&self, _text: &str) {}
    fn stop(&self) {}
    fn is_busy(&self) -> bool {
        false
    }
}

/// Rate-limited wrapper around a `VoiceSink`.
pub struct VoiceDispatcher {
    sink: Arc<dyn VoiceSink>,
    enabled: bool,
    cooldowns: CooldownRegistry,
}

impl VoiceDispatcher {
    pub fn new(sink: Arc<dyn VoiceSink>) -> Self {
        Self {
            sink,
            enabled: true,
            cooldowns: CooldownRegistry::new(),
        }
    }

    /// Attempt to speak `text` under `key`'s cooldown.
    ///
    /// Returns whether the utterance was handed to the sink. Disabled
    /// channel, an unexpired cooldown, or a busy sink all skip silently.
    pub fn speak(&mut self, text: &str, key: &'static str, cooldown_ms: u64, now_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }
        if !self.cooldowns.eligible(key, now_ms, cooldown_ms) {
            debug!(key, "voice suppressed: cooldown");
            return false;
        }
        if self.sink.is_busy() {
            debug!(key, "voice skipped: utterance in progress");
            return false;
        }

        self.sink.speak(text);
        self.cooldowns.record(key, now_ms);
        true
    }

    /// Cancel any in-flight utterance
    pub fn stop(&self) {
        self.sink.stop();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_speaking(&self) -> bool {
        self.sink.is_busy()
    }

    /// Stop speech and forget voice cooldowns (session stop)
    pub fn reset(&mut self) {
        self.sink.stop();
        self.cooldowns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        spoken: Mutex<Vec<String>>,
        busy: AtomicBool,
        stops: AtomicUsize,
    }

    impl VoiceSink for RecordingSink {
        fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
        fn is_busy(&self) -> bool {
            self.busy.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_speak_records_cooldown() {
        let sink = Arc::new(RecordingSink::default());
        let mut voice = VoiceDispatcher::new(sink.clone());

        assert!(voice.speak("sit back", "tooClose", 75_000, 1_000));
        assert!(!voice.speak("sit back", "tooClose", 75_000, 2_000));
        assert!(voice.speak("sit back", "tooClose", 75_000, 76_000));
        assert_eq!(sink.spoken.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_skip_if_busy() {
        let sink = Arc::new(RecordingSink::default());
        sink.busy.store(true, Ordering::SeqCst);
        let mut voice = VoiceDispatcher::new(sink.clone());

        assert!(!voice.speak("blink", "lowBlink", 90_000, 1_000));
        assert!(sink.spoken.lock().unwrap().is_empty());
        // The skipped attempt must not burn the cooldown
        sink.busy.store(false, Ordering::SeqCst);
        assert!(voice.speak("blink", "lowBlink", 90_000, 1_001));
    }

    #[test]
    fn test_disable_does_not_bypass_cooldown() {
        let sink = Arc::new(RecordingSink::default());
        let mut voice = VoiceDispatcher::new(sink.clone());

        assert!(voice.speak("rest", "critFatigue", 150_000, 1_000));
        voice.set_enabled(false);
        assert!(!voice.speak("rest", "critFatigue", 150_000, 2_000));
        voice.set_enabled(true);
        // Still inside the cooldown recorded before the toggle
        assert!(!voice.speak("rest", "critFatigue", 150_000, 3_000));
    }

    #[test]
    fn test_reset_stops_and_clears() {
        let sink = Arc::new(RecordingSink::default());
        let mut voice = VoiceDispatcher::new(sink.clone());

        voice.speak("rest", "critFatigue", 150_000, 1_000);
        voice.reset();
        assert_eq!(sink.stops.load(Ordering::SeqCst), 1);
        assert!(voice.speak("rest", "critFatigue", 150_000, 1_001));
    }
}
