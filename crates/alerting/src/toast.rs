//! Bounded, auto-expiring toast queue

use std::collections::VecDeque;

use crate::AlertEvent;

/// Maximum toasts held at once; the oldest is dropped beyond this.
pub const TOAST_CAP: usize = 5;

/// How long a toast stays visible (milliseconds)
pub const TOAST_DISPLAY_MS: u64 = 7_000;

/// A queued toast with its expiry time
#[derive(Debug, Clone)]
pub struct Toast {
    pub event: AlertEvent,
    pub expires_at_ms: u64,
}

/// In-flight toast notifications.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a toast, dropping the oldest beyond the cap.
    pub fn push(&mut self, event: AlertEvent, now_ms: u64) {
        self.purge(now_ms);
        if self.toasts.len() >= TOAST_CAP {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            event,
            expires_at_ms: now_ms + TOAST_DISPLAY_MS,
        });
    }

    /// Toasts still within their display window
    pub fn active(&mut self, now_ms: u64) -> &VecDeque<Toast> {
        self.purge(now_ms);
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    fn purge(&mut self, now_ms: u64) {
        while let Some(front) = self.toasts.front() {
            if front.expires_at_ms <= now_ms {
                self.toasts.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlertCategory;

    fn toast_event(msg: &str, ts: u64) -> AlertEvent {
        AlertEvent::toast(AlertCategory::Info, msg, ts)
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut queue = ToastQueue::new();
        for i in 0..7 {
            queue.push(toast_event(&format!("t{i}"), 1_000), 1_000);
        }
        assert_eq!(queue.len(), TOAST_CAP);
        assert_eq!(queue.active(1_000).front().unwrap().event.message, "t2");
    }

    #[test]
    fn test_toasts_expire_after_display_window() {
        let mut queue = ToastQueue::new();
        queue.push(toast_event("hydrate", 1_000), 1_000);

        assert_eq!(queue.active(7_999).len(), 1);
        assert_eq!(queue.active(8_000).len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut queue = ToastQueue::new();
        queue.push(toast_event("x", 0), 0);
        queue.clear();
        assert!(queue.is_empty());
    }
}
