//! Alerting
//!
//! Evaluates threshold and periodic rules against live metrics and
//! dispatches notifications under strict per-rule rate limiting:
//! - `CooldownRegistry` gates every rule by key
//! - toast events land in a bounded, auto-expiring queue
//! - voice dispatch is best-effort with its own cooldowns and busy policy
//! - periodic rules ride a one-second tick (exact modulo matching)

pub mod cooldown;
pub mod coordinator;
pub mod countdown;
pub mod event;
pub mod rules;
pub mod toast;
pub mod voice;

pub use cooldown::CooldownRegistry;
pub use coordinator::{AlertConfig, AlertCoordinator};
pub use countdown::{BreakCountdown, CountdownTick};
pub use event::{AlertCategory, AlertEvent, Channel};
pub use rules::{AlertRule, TimeRule};
pub use toast::{Toast, ToastQueue};
pub use voice::{NullVoice, VoiceDispatcher, VoiceSink};
