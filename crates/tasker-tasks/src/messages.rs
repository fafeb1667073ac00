//! Empty-state messages.
//!
//! An optional JSON feed (`{"noTasksMessages": [...]}`) supplies the rotating
//! line shown when the view is empty. A missing, unreadable, or empty feed
//! falls back to the built-in set.

use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::query::View;

/// Built-in message used when no feed is available.
pub const FALLBACK_MESSAGE: &str = "🎉 No tasks left!";

/// Shown under a non-empty view.
pub const END_OF_LIST_MESSAGE: &str = "📦 Looks like you've reached the end.";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageFeed {
    #[serde(default)]
    no_tasks_messages: Option<Vec<String>>,
}

/// The pool of empty-state messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyStateMessages {
    messages: Vec<String>,
}

impl Default for EmptyStateMessages {
    fn default() -> Self {
        Self {
            messages: vec![FALLBACK_MESSAGE.to_string()],
        }
    }
}

impl EmptyStateMessages {
    /// Messages from a feed document, `None` if it has no usable list.
    pub fn from_json(raw: &str) -> Option<Self> {
        let feed: MessageFeed = serde_json::from_str(raw).ok()?;
        let messages: Vec<String> = feed
            .no_tasks_messages?
            .into_iter()
            .filter(|m| !m.trim().is_empty())
            .collect();
        (!messages.is_empty()).then_some(Self { messages })
    }

    /// Load the feed at `path`, falling back to the built-in set.
    pub fn load_or_default(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(?path, error = %e, "failed to read message feed, using built-in messages");
                return Self::default();
            }
        };
        if let Some(messages) = Self::from_json(&raw) {
            debug!(?path, count = messages.len(), "loaded message feed");
            messages
        } else {
            warn!(?path, "message feed has no usable noTasksMessages, using built-in messages");
            Self::default()
        }
    }

    /// Number of messages in the pool.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; the pool keeps at least one message.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// A random message from the pool.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &str {
        self.messages
            .get(rng.random_range(0..self.messages.len()))
            .map_or(FALLBACK_MESSAGE, String::as_str)
    }
}

/// Footer line for a view: the end-of-list marker when it has entries, a
/// "nothing found" line when a search came up empty, otherwise a random
/// empty-state message.
pub fn footer_message<R: Rng>(
    view: &View<'_>,
    search: &str,
    messages: &EmptyStateMessages,
    rng: &mut R,
) -> String {
    if !view.is_empty() {
        END_OF_LIST_MESSAGE.to_string()
    } else if !search.is_empty() {
        format!("No tasks found for \"{}\"", search.to_lowercase())
    } else {
        messages.pick(rng).to_string()
    }
}
