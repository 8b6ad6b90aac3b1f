use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One transcript entry.
///
/// Fields are read-only from outside the crate's core: a message is fixed once
/// it has been appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    content: String,
    is_user: bool,
    timestamp: DateTime<Utc>,
    model: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>, model: Option<String>) -> Self {
        Self::new(content, true, model)
    }

    /// Assistant-authored entry: a backend reply, a fallback, or a system notice.
    pub fn assistant(content: impl Into<String>, model: Option<String>) -> Self {
        Self::new(content, false, model)
    }

    fn new(content: impl Into<String>, is_user: bool, model: Option<String>) -> Self {
        Self {
            content: content.into(),
            is_user,
            timestamp: Utc::now(),
            model,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }

    pub fn is_assistant(&self) -> bool {
        !self.is_user
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}
