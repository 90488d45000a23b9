//! Post model

use serde::{Deserialize, Serialize};

use crate::util::unix_timestamp_ms;

/// A short text post belonging to one user.
///
/// `id` is assigned by the document store on insert, so a freshly built
/// post has none. `timestamp` is unix milliseconds and is restamped on
/// every edit, which is what the feed sorts by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub timestamp: i64,
    pub user_id: String,
}

impl Post {
    /// Creates an unsaved post stamped with the current time.
    #[must_use]
    pub fn new(title: String, content: String, user_id: String) -> Self {
        Self {
            id: None,
            title,
            content,
            timestamp: unix_timestamp_ms(),
            user_id,
        }
    }

    /// Returns a preview of the title, truncated to `max_chars`.
    #[must_use]
    pub fn title_preview(&self, max_chars: usize) -> String {
        let title = self.title.trim();
        if title.chars().count() <= max_chars {
            title.to_string()
        } else {
            let truncated: String = title.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{truncated}...")
        }
    }
}
