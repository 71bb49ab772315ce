//! User-facing notices raised by export and share actions.
//!
//! The orchestrator reports through this capability instead of knowing how a
//! notice reaches the user. The production notifier writes them to the log,
//! and the HTTP layer carries warnings back on the response.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, user_id: Uuid, notice: Notice);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, user_id: Uuid, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!("[{user_id}] {}: {}", notice.title, notice.description),
            NoticeLevel::Warning | NoticeLevel::Error => {
                warn!("[{user_id}] {}: {}", notice.title, notice.description)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct RecordingNotifier {
        notices: Mutex<Vec<(Uuid, Notice)>>,
    }

    impl RecordingNotifier {
        pub fn notices(&self) -> Vec<Notice> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|(_, n)| n.clone())
                .collect()
        }

        pub fn levels(&self) -> Vec<NoticeLevel> {
            self.notices().iter().map(|n| n.level).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, user_id: Uuid, notice: Notice) {
            self.notices.lock().unwrap().push((user_id, notice));
        }
    }
}
