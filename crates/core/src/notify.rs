use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), kind: NotificationKind::Success }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), kind: NotificationKind::Error }
    }
}

/// Fire-and-forget confirmation channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(notifications) => notifications.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns and forgets everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(mut notifications) => std::mem::take(&mut *notifications),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        match self.notifications.lock() {
            Ok(mut notifications) => notifications.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
