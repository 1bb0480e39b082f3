//! Request and response bodies exchanged with the local backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Body of `POST /stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub question: String,
    /// Conversation history, flattened to text.
    #[serde(default)]
    pub context: String,
    /// Reply language code.
    #[serde(default)]
    pub language: String,
    /// Name the assistant should address the user by.
    #[serde(default, rename = "userName")]
    pub user_name: String,
    /// Model identifier. Empty means the client default.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
}

impl ChatRequest {
    /// A request with only a question; the client fills in the rest.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: String::new(),
            language: String::new(),
            user_name: String::new(),
            model: String::new(),
        }
    }

    /// Attach conversation history.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Pin the model for this request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// An entry of the model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    /// Identifier sent to the backend.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Size label.
    pub size: &'static str,
}

/// Models offered by the selector, default first.
pub const MODEL_CATALOG: &[ModelInfo] = &[
    ModelInfo {
        id: "llama3.2",
        name: "Llama 3.2",
        description: "Fast & efficient",
        size: "Llama 3.2 3B",
    },
    ModelInfo {
        id: "mistral",
        name: "Mistral: Latest",
        description: "Compact powerhouse",
        size: "Mistral 3.8B",
    },
    ModelInfo {
        id: "gemma2:2b",
        name: "Gemma 2 2B",
        description: "Lightweight model",
        size: "Gemma 2 2B",
    },
];

/// Look up a catalog entry by id.
pub fn model_info(id: &str) -> Option<&'static ModelInfo> {
    MODEL_CATALOG.iter().find(|m| m.id == id)
}

/// Body of `GET /models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    /// Model identifiers the backend can serve.
    pub available_models: Vec<String>,
}

/// The emotional tone of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    /// Graph value 0.
    Happy,
    /// Graph value 1.
    Sad,
    /// Graph value 2.
    Neutral,
}

impl Mood {
    /// The integer the backend stores.
    pub fn graph_value(self) -> u8 {
        match self {
            Self::Happy => 0,
            Self::Sad => 1,
            Self::Neutral => 2,
        }
    }

    /// Inverse of [`Mood::graph_value`].
    pub fn from_graph_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Happy),
            1 => Some(Self::Sad),
            2 => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Body of `POST /mood`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRequest {
    /// Graph value of the mood.
    pub graph: u8,
}

/// One element of `GET /mood`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Graph value of the mood.
    pub mood: u8,
    /// Local time the mood was logged.
    pub timestamp: NaiveDateTime,
}

impl MoodEntry {
    /// The mood, if the stored value is known.
    pub fn mood(&self) -> Option<Mood> {
        Mood::from_graph_value(self.mood)
    }
}

/// One element of `GET /mood_summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSummary {
    /// HTML summary text.
    pub summary: String,
}

/// Shown when the backend has no summary yet.
pub const NO_SUMMARY_MESSAGE: &str = "No summary available for today.";

/// A stored special memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    /// Row id.
    pub id: i64,
    /// Short title.
    pub title: String,
    /// Memory text.
    pub memory: String,
    /// Backend timestamp, passed through untouched.
    pub timestamp: String,
}

/// Body of `PUT /special_memory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUpdate {
    /// Row id.
    pub id: i64,
    /// New title.
    pub title: String,
    /// New text.
    pub memory: String,
}

impl From<&Memory> for MemoryUpdate {
    fn from(memory: &Memory) -> Self {
        Self {
            id: memory.id,
            title: memory.title.clone(),
            memory: memory.memory.clone(),
        }
    }
}

/// Body of `DELETE /memory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDelete {
    /// Row id.
    pub id: i64,
    /// Table the row lives in.
    pub table: String,
}

/// Table holding special memories.
pub const SPECIAL_MEMORIES_TABLE: &str = "special_memories";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_uses_camel_case_user_name() {
        let mut req = ChatRequest::new("hi").with_model("mistral");
        req.user_name = "Sam".into();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userName"], "Sam");
        assert_eq!(json["model"], "mistral");
        assert!(json.get("user_name").is_none());
    }

    #[test]
    fn empty_model_is_omitted() {
        let json = serde_json::to_value(ChatRequest::new("hi")).unwrap();
        assert!(json.get("model").is_none());
    }

    #[test]
    fn mood_graph_values() {
        for mood in [Mood::Happy, Mood::Sad, Mood::Neutral] {
            assert_eq!(Mood::from_graph_value(mood.graph_value()), Some(mood));
        }
        assert_eq!(Mood::from_graph_value(7), None);
    }

    #[test]
    fn mood_entry_parses_python_isoformat() {
        let entry: MoodEntry =
            serde_json::from_str(r#"{"mood": 1, "timestamp": "2025-03-01T09:15:42.123456"}"#)
                .unwrap();
        assert_eq!(entry.mood(), Some(Mood::Sad));
        assert_eq!(entry.timestamp.to_string(), "2025-03-01 09:15:42.123456");
    }

    #[test]
    fn catalog_default_is_llama() {
        assert_eq!(MODEL_CATALOG[0].id, "llama3.2");
        assert_eq!(model_info("gemma2:2b").map(|m| m.name), Some("Gemma 2 2B"));
        assert!(model_info("gpt-4").is_none());
    }
}
