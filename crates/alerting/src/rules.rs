//! Alert rule tables

use crate::AlertCategory;

/// A single alert rule: key, cooldown, message, and channels.
///
/// Conditions live in the coordinator; the tables here only describe
/// identity and presentation.
#[derive(Debug, Clone, Copy)]
pub struct AlertRule {
    pub key: &'static str,
    pub cooldown_ms: u64,
    pub category: AlertCategory,
    pub message: &'static str,
    /// Whether the rule also targets the voice channel
    pub voice: bool,
}

/// A rule fired on exact multiples of `interval_s` elapsed session seconds
#[derive(Debug, Clone, Copy)]
pub struct TimeRule {
    pub rule: AlertRule,
    pub interval_s: u64,
}

pub(crate) const TOO_CLOSE: AlertRule = AlertRule {
    key: "tooClose",
    cooldown_ms: 75_000,
    category: AlertCategory::Danger,
    message: "You're sitting too close to the screen. Move back a little.",
    voice: true,
};

pub(crate) const LOW_BLINK: AlertRule = AlertRule {
    key: "lowBlink",
    cooldown_ms: 90_000,
    category: AlertCategory::Warning,
    message: "Your blink rate is low. Remember to blink to keep your eyes moist.",
    voice: true,
};

pub(crate) const CRIT_FATIGUE: AlertRule = AlertRule {
    key: "critFatigue",
    cooldown_ms: 150_000,
    category: AlertCategory::Danger,
    message: "Critical eye fatigue detected. Take a break now.",
    voice: true,
};

pub(crate) const BREAK_2020: TimeRule = TimeRule {
    rule: AlertRule {
        key: "break2020",
        cooldown_ms: 60_000,
        category: AlertCategory::Info,
        message: "Time for a 20-20-20 break: look at something 20 feet away for 20 seconds.",
        voice: true,
    },
    interval_s: 1_200,
};

pub(crate) const HYDRATION: TimeRule = TimeRule {
    rule: AlertRule {
        key: "hydration",
        cooldown_ms: 60_000,
        category: AlertCategory::Info,
        message: "Hydration check: drink some water.",
        voice: false,
    },
    interval_s: 900,
};

pub(crate) const LONG_BREAK: TimeRule = TimeRule {
    rule: AlertRule {
        key: "longBreak",
        cooldown_ms: 60_000,
        category: AlertCategory::Warning,
        message: "You've been at the screen a long time. Stand up and stretch.",
        voice: false,
    },
    interval_s: 3_000,
};
