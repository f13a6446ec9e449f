//! Notification events

use serde::{Deserialize, Serialize};

/// Event severity / presentation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Danger,
    Warning,
    Info,
    Success,
}

/// Delivery channel for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Voice,
    Toast,
}

/// A notification produced by the alert coordinator and consumed by the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub category: AlertCategory,
    pub message: String,
    pub channels: Vec<Channel>,
    pub timestamp_ms: u64,
}

impl AlertEvent {
    /// Event targeting the toast channel only
    pub fn toast(category: AlertCategory, message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            category,
            message: message.into(),
            channels: vec![Channel::Toast],
            timestamp_ms,
        }
    }

    /// Event targeting both voice and toast channels
    pub fn voiced(category: AlertCategory, message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            category,
            message: message.into(),
            channels: vec![Channel::Voice, Channel::Toast],
            timestamp_ms,
        }
    }

    pub fn targets(&self, channel: Channel) -> bool {
        self.channels.contains(&channel)
    }
}
