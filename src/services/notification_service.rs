use crate::error::Error;
use crate::models::notification::Notification;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Ordered queue of transient notifications. Each entry removes itself after its lifetime.
#[derive(Clone)]
pub struct NotificationService {
    inner: Arc<Mutex<Queue>>,
    default_duration: Duration,
}

#[derive(Default)]
struct Queue {
    entries: Vec<Notification>,
    timers: HashMap<String, JoinHandle<()>>,
}

impl NotificationService {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Queue::default())),
            default_duration,
        }
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Appends `notification` and schedules its expiry. Returns its id.
    pub fn push(&self, notification: Notification) -> String {
        let id = notification.id.clone();
        let lifetime = notification.lifetime(self.default_duration);
        tracing::debug!(id = %id, severity = ?notification.severity, message = %notification.message, "Notification added");

        let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        queue.entries.push(notification);

        match Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.inner);
                let timer_id = id.clone();
                let timer = handle.spawn(async move {
                    tokio::time::sleep(lifetime).await;
                    expire(&weak, &timer_id);
                });
                queue.timers.insert(id.clone(), timer);
            }
            Err(_) => {
                tracing::warn!(id = %id, "No async runtime; notification will not expire on its own");
            }
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.push(Notification::success(message))
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.push(Notification::error(message))
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.push(Notification::warning(message))
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.push(Notification::info(message))
    }

    /// Surfaces a failed operation as an error notification, unless the failure is silent.
    /// Returns the text shown.
    pub fn report_failure(&self, error: &Error, fallback: &str) -> Option<String> {
        if !error.is_reportable() {
            return None;
        }
        let message = error.user_message(fallback);
        self.error(message.clone());
        Some(message)
    }

    /// Removes the entry and cancels its timer. Unknown ids are a no-op.
    pub fn remove(&self, id: &str) -> bool {
        let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let Some(pos) = queue.entries.iter().position(|n| n.id == id) else {
            return false;
        };
        queue.entries.remove(pos);
        if let Some(timer) = queue.timers.remove(id) {
            timer.abort();
        }
        true
    }

    /// Snapshot in insertion order.
    pub fn list(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn expire(queue: &Weak<Mutex<Queue>>, id: &str) {
    let Some(queue) = queue.upgrade() else {
        return;
    };
    let mut queue = queue.lock().unwrap_or_else(|e| e.into_inner());
    queue.timers.remove(id);
    queue.entries.retain(|n| n.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::Severity;

    fn service() -> NotificationService {
        NotificationService::new(Duration::from_millis(4000))
    }

    #[tokio::test(start_paused = true)]
    async fn expires_after_default_lifetime() {
        let notifications = service();
        notifications.success("Saved");

        tokio::time::sleep(Duration::from_millis(3999)).await;
        assert_eq!(notifications.len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(notifications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_insertion_order_and_per_entry_lifetime() {
        let notifications = service();
        let short = notifications.push(Notification::info("short").with_duration(Duration::from_millis(500)));
        let long = notifications.error("long");

        let listed = notifications.list();
        assert_eq!(listed[0].id, short);
        assert_eq!(listed[1].id, long);
        assert_eq!(listed[1].severity, Severity::Error);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let remaining: Vec<String> = notifications.list().into_iter().map(|n| n.id).collect();
        assert_eq!(remaining, vec![long]);
    }

    #[tokio::test(start_paused = true)]
    async fn early_remove_cancels_timer() {
        let notifications = service();
        let id = notifications.warning("Heads up");
        let other = notifications.info("Still here");

        assert!(notifications.remove(&id));
        assert!(!notifications.remove(&id));
        assert!(!notifications.remove("missing"));
        assert_eq!(notifications.len(), 1);

        tokio::time::sleep(Duration::from_millis(4001)).await;
        assert!(notifications.is_empty());
        assert!(!notifications.remove(&other));
    }

    #[tokio::test]
    async fn silent_failures_are_not_reported() {
        let notifications = service();
        assert!(notifications
            .report_failure(&Error::AuthorizationExpired, "Failed")
            .is_none());
        assert!(notifications.report_failure(&Error::Cancelled, "Failed").is_none());

        assert_eq!(
            notifications
                .report_failure(&Error::request(Some(500), "Boom"), "Failed")
                .as_deref(),
            Some("Boom")
        );
        notifications.report_failure(
            &Error::Request {
                status: Some(502),
                message: None,
            },
            "Failed to fetch jobs",
        );
        let messages: Vec<String> = notifications.list().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["Boom", "Failed to fetch jobs"]);
    }

    #[test]
    fn push_without_runtime_still_queues() {
        let notifications = service();
        notifications.info("offline");
        assert_eq!(notifications.len(), 1);
    }
}
