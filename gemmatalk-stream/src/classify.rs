//! Line classification: structured status records first, substring
//! heuristics second, content otherwise.

use gemmatalk_types::{Event, StatusEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The single configuration point for what the backend's stream looks like.
///
/// The backend protocol is not formally specified; the status substrings are
/// the diagnostics observed from the Python server and `ollama pull`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Event markers stripped from the start of a line. The first match wins.
    pub prefixes: Vec<String>,
    /// Payload that terminates the stream.
    pub end_marker: String,
    /// Substrings that mark a non-JSON line as a status message.
    pub status_patterns: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            prefixes: vec!["data: ".into(), "data:".into()],
            end_marker: "[END]".into(),
            status_patterns: [
                "pulling manifest",
                "verifying sha256",
                "writing manifest",
                "success",
                "Model not found locally",
                "Download completed",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Fields of a structured status record. Every field is an untyped JSON
/// value so that any object parses; [`Classifier`] decides whether it is a
/// status, and unusable counters only cost the progress part.
#[derive(Debug, Default, Deserialize)]
struct StatusRecord {
    status: Option<Value>,
    digest: Option<Value>,
    completed: Option<Value>,
    total: Option<Value>,
}

impl StatusRecord {
    fn into_event(self) -> Option<StatusEvent> {
        let status = self.status.as_ref().and_then(Value::as_str);
        let digest = self.digest.as_ref().and_then(Value::as_str);
        let completed = self.completed.as_ref().and_then(byte_count);
        let total = self.total.as_ref().and_then(byte_count);

        let progress = match (digest, completed, total) {
            (Some(digest), Some(completed), Some(total)) => Some((digest, completed, total)),
            _ => None,
        };
        if status.is_none() && progress.is_none() {
            return None;
        }
        Some(StatusEvent {
            message: status.unwrap_or_default().to_string(),
            digest: progress.map(|(digest, _, _)| digest.to_string()),
            completed: progress.map(|(_, completed, _)| completed),
            total: progress.map(|(_, _, total)| total),
        })
    }
}

/// A byte counter from any JSON number. Fractions are floored; negative,
/// non-finite and non-numeric values are unusable.
fn byte_count(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    let count = value.as_f64()?;
    (count.is_finite() && count >= 0.0).then(|| count as u64)
}

/// Tags stream lines as [`Event`]s.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// A classifier with the default markers and patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// A classifier with custom markers and patterns.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one line. Blank payloads (keep-alives, SSE separators)
    /// produce `None`; every other line produces exactly one event.
    pub fn classify(&self, line: &str) -> Option<Event> {
        let payload = self.strip_prefix(line);
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return None;
        }

        let event = if trimmed == self.config.end_marker {
            Event::EndOfStream
        } else if let Some(status) = parse_status_record(trimmed) {
            Event::Status(status)
        } else if self.is_status_text(trimmed) {
            Event::status(trimmed)
        } else {
            Event::content(payload)
        };

        tracing::trace!(line = %line, event = ?event, "classified stream line");
        Some(event)
    }

    /// Whether bare text matches one of the known diagnostic substrings.
    pub fn is_status_text(&self, text: &str) -> bool {
        self.config
            .status_patterns
            .iter()
            .any(|pattern| text.contains(pattern.as_str()))
    }

    fn strip_prefix<'a>(&self, line: &'a str) -> &'a str {
        self.config
            .prefixes
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix.as_str()))
            .unwrap_or(line)
    }
}

fn parse_status_record(payload: &str) -> Option<StatusEvent> {
    if !payload.starts_with('{') {
        return None;
    }
    serde_json::from_str::<StatusRecord>(payload)
        .ok()
        .and_then(StatusRecord::into_event)
}
