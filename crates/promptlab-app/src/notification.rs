//! Transient toast notifications

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

/// Newest-last queue of toasts; expired entries are dropped on `Tick`
#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::from_millis(4000))
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) {
        if self.items.len() == MAX_VISIBLE {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            level,
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message);
    }

    /// Drop everything that expired at or before `now`
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn latest_error(&self) -> Option<&Notification> {
        self.items
            .iter()
            .rev()
            .find(|n| n.level == NotificationLevel::Error)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
