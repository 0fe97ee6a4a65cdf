//! Transient page notifications

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::views::lock;

/// Default time a notification stays visible
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    current: Option<Notification>,
}

/// One notification slot per page
///
/// Showing a message replaces the current one and reschedules the clear;
/// a clear only ever removes the message it was scheduled for.
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            timer: Mutex::new(None),
            timeout,
        }
    }

    /// Show a message
    ///
    /// Outside a tokio runtime the message is shown but never auto-cleared.
    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) {
        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.current = Some(Notification {
                kind,
                message: message.into(),
            });
            slot.generation
        };

        let Ok(runtime) = Handle::try_current() else {
            debug!("No runtime, notification will not auto-clear");
            return;
        };
        let slot = self.slot.clone();
        let timeout = self.timeout;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut slot = lock(&slot);
            if slot.generation == generation {
                slot.current = None;
            }
        });

        if let Some(previous) = lock(&self.timer).replace(handle) {
            previous.abort();
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(NotificationKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(NotificationKind::Info, message);
    }

    /// The message currently on screen, if any
    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot).current.clone()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_TIMEOUT)
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}
