//! List/Table views: load state, derived statistics and one-shot notices.

pub mod list;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use list::{ListState, ListView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient notification shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, title: title.into(), description: description.into() }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, title: title.into(), description: description.into() }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// CSS modifier for the toast.
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        }
    }
}
