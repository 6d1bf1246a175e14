//! User notification capability

use std::sync::{Mutex, PoisonError};

use crate::types::{Notice, NoticeLevel};

/// Notifier trait
///
/// Injected into the widget in place of a global alert bus.
pub trait Notifier: Send + Sync {
    /// Transient warning (validation or conversion refused)
    fn warn(&self, message: &str);

    /// Danger-level error (persistence failure)
    fn error(&self, message: &str);
}

/// Notifier that writes through the `log` facade only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Notifier that queues notices for the host UI to drain.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of the queued notices without removing them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice::new(level, message));
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.push(NoticeLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(NoticeLevel::Danger, message);
    }
}
