//! Alert coordination
//!
//! Threshold rules are checked on every frame's metrics snapshot; time
//! rules are checked on the one-second tick by exact-modulo matching on
//! elapsed session seconds, so a skipped tick silently skips that
//! boundary (the tick source is assumed reliable). Every firing records
//! a cooldown, enqueues a toast, and (for voice rules) attempts a
//! best-effort utterance.

use std::sync::Arc;

use eye_metrics::MetricsSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::countdown::CountdownTick;
use crate::rules::{self, AlertRule};
use crate::{
    AlertCategory, AlertEvent, BreakCountdown, CooldownRegistry, ToastQueue, VoiceDispatcher,
    VoiceSink,
};

/// Threshold and timing knobs for the rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Distances under this fire `tooClose` (cm)
    pub too_close_cm: f32,
    /// Blink rates under this fire `lowBlink`
    pub low_blink_rate: u32,
    /// `lowBlink` stays silent before this much session time (seconds)
    pub low_blink_grace_s: u64,
    /// Fatigue scores at or above this fire `critFatigue`
    pub crit_fatigue_score: u8,
    /// Length of the 20-20-20 break countdown (seconds)
    pub break_countdown_s: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            too_close_cm: 40.0,
            low_blink_rate: 8,
            low_blink_grace_s: 60,
            crit_fatigue_score: 80,
            break_countdown_s: 20,
        }
    }
}

/// Evaluates alert rules and dispatches notifications.
pub struct AlertCoordinator {
    config: AlertConfig,
    cooldowns: CooldownRegistry,
    toasts: ToastQueue,
    countdown: BreakCountdown,
    voice: VoiceDispatcher,
}

impl AlertCoordinator {
    pub fn new(config: AlertConfig, voice_sink: Arc<dyn VoiceSink>) -> Self {
        Self {
            config,
            cooldowns: CooldownRegistry::new(),
            toasts: ToastQueue::new(),
            countdown: BreakCountdown::new(),
            voice: VoiceDispatcher::new(voice_sink),
        }
    }

    /// Evaluate threshold rules against one frame's snapshot.
    pub fn evaluate_frame(&mut self, snapshot: &MetricsSnapshot, now_ms: u64) -> Vec<AlertEvent> {
        if !snapshot.face_detected {
            return Vec::new();
        }

        let mut events = Vec::new();

        if snapshot.distance_cm < self.config.too_close_cm {
            self.try_fire(rules::TOO_CLOSE, now_ms, &mut events);
        }

        let blink_observed = snapshot.session_seconds >= self.config.low_blink_grace_s;
        if blink_observed && snapshot.blink_rate < self.config.low_blink_rate {
            self.try_fire(rules::LOW_BLINK, now_ms, &mut events);
        }

        if snapshot.fatigue >= self.config.crit_fatigue_score {
            self.try_fire(rules::CRIT_FATIGUE, now_ms, &mut events);
        }

        events
    }

    /// Advance one second of session time and evaluate periodic rules.
    ///
    /// `session_seconds` is the elapsed whole-second count; each time rule
    /// fires exactly when it is a positive multiple of the rule interval.
    pub fn tick(&mut self, session_seconds: u64, now_ms: u64) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        if let CountdownTick::Finished = self.countdown.tick() {
            let event = AlertEvent::toast(
                AlertCategory::Success,
                "Break complete. Nice work, your eyes thank you.",
                now_ms,
            );
            self.toasts.push(event.clone(), now_ms);
            events.push(event);
        }

        if session_seconds == 0 {
            return events;
        }

        if session_seconds % rules::BREAK_2020.interval_s == 0
            && self.try_fire(rules::BREAK_2020.rule, now_ms, &mut events)
        {
            self.countdown.start(self.config.break_countdown_s);
        }

        if session_seconds % rules::HYDRATION.interval_s == 0 {
            self.try_fire(rules::HYDRATION.rule, now_ms, &mut events);
        }

        if session_seconds % rules::LONG_BREAK.interval_s == 0 {
            self.try_fire(rules::LONG_BREAK.rule, now_ms, &mut events);
        }

        events
    }

    /// Fire `rule` if its cooldown allows; returns whether it fired.
    fn try_fire(&mut self, rule: AlertRule, now_ms: u64, events: &mut Vec<AlertEvent>) -> bool {
        if !self.cooldowns.eligible(rule.key, now_ms, rule.cooldown_ms) {
            debug!(key = rule.key, "alert suppressed: cooldown");
            return false;
        }

        self.cooldowns.record(rule.key, now_ms);

        let event = if rule.voice {
            AlertEvent::voiced(rule.category, rule.message, now_ms)
        } else {
            AlertEvent::toast(rule.category, rule.message, now_ms)
        };

        self.toasts.push(event.clone(), now_ms);
        if rule.voice {
            self.voice
                .speak(rule.message, rule.key, rule.cooldown_ms, now_ms);
        }

        info!(key = rule.key, category = ?rule.category, "alert fired");
        events.push(event);
        true
    }

    pub fn toasts(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn voice(&mut self) -> &mut VoiceDispatcher {
        &mut self.voice
    }

    pub fn break_remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    /// Clear cooldowns, toasts, and the countdown; stop any utterance.
    pub fn reset(&mut self) {
        self.cooldowns.clear();
        self.toasts.clear();
        self.countdown.cancel();
        self.voice.reset();
    }
}
