//! Wellness data that outlives a chat turn: user name, tracker visits,
//! goals, and the gratitude journal.
//!
//! State is loaded once at startup and saved after each change through a
//! [`StateStore`]; nothing here is global.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StateError;
use crate::state::StateStore;

/// Key the whole [`AppState`] is stored under.
pub const APP_STATE_KEY: &str = "app_state";

/// A small, achievable goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Stable identifier.
    pub id: Uuid,
    /// What the user wants to do.
    pub text: String,
    /// Whether it has been ticked off.
    pub completed: bool,
}

/// A gratitude journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry text.
    pub text: String,
    /// When it was written.
    pub timestamp: DateTime<Utc>,
}

/// Persisted application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// Name shown in greetings and sent with chat requests.
    pub user_name: String,
    /// Tracker ids the user has opened.
    pub visited_trackers: BTreeSet<String>,
    /// Tracker ids the user has finished.
    pub completed_trackers: BTreeSet<String>,
    /// Goals in creation order.
    pub goals: Vec<Goal>,
    /// Journal entries in creation order.
    pub journal: Vec<JournalEntry>,
}

impl AppState {
    /// Load from `store`, falling back to the default when nothing is saved.
    pub async fn load(store: &dyn StateStore) -> Result<Self, StateError> {
        match store.read(APP_STATE_KEY).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| StateError::Serialization(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Persist to `store`.
    pub async fn save(&self, store: &dyn StateStore) -> Result<(), StateError> {
        let value =
            serde_json::to_value(self).map_err(|e| StateError::Serialization(e.to_string()))?;
        store.write(APP_STATE_KEY, value).await
    }

    /// Set the user's display name, trimmed.
    pub fn set_user_name(&mut self, name: &str) {
        self.user_name = name.trim().to_string();
    }

    /// Record a tracker visit. Returns `false` if it was already visited.
    pub fn mark_visited(&mut self, tracker_id: &str) -> bool {
        self.visited_trackers.insert(tracker_id.to_string())
    }

    /// Record a tracker as finished. Returns `false` if it already was.
    pub fn mark_completed(&mut self, tracker_id: &str) -> bool {
        self.completed_trackers.insert(tracker_id.to_string())
    }

    /// Add a goal. Blank text is ignored.
    pub fn add_goal(&mut self, text: &str) -> Option<&Goal> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.goals.push(Goal {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
        });
        self.goals.last()
    }

    /// Flip a goal's completion flag. Returns the new flag, or `None` for an
    /// unknown id.
    pub fn toggle_goal(&mut self, id: Uuid) -> Option<bool> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.completed = !goal.completed;
        Some(goal.completed)
    }

    /// Append a journal entry stamped now. Blank text is ignored.
    pub fn add_journal_entry(&mut self, text: &str) -> Option<&JournalEntry> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.journal.push(JournalEntry {
            text: text.to_string(),
            timestamp: Utc::now(),
        });
        self.journal.last()
    }
}
