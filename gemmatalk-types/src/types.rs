//! Stream records, classified events, and presentation state.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One record produced by line reassembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line text without its terminator.
    pub text: String,
    /// `true` when the stream ended before this line saw a newline.
    pub partial: bool,
}

impl Line {
    /// A newline-terminated line.
    pub fn complete(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            partial: false,
        }
    }

    /// The unterminated tail left in the buffer at end of stream.
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            partial: true,
        }
    }
}

/// Download or setup progress reported by the backend.
///
/// Either a structured record (`{"status": ...}` or a
/// `digest`/`completed`/`total` triple) or a bare diagnostic line matched by
/// the heuristic classifier, in which case only `message` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Human-readable status text. Empty for bare progress records.
    #[serde(default)]
    pub message: String,
    /// Layer digest the progress counters refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Bytes completed so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
    /// Total bytes expected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl StatusEvent {
    /// A status event carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Progress counters, if all three of `digest`, `completed` and `total`
    /// are present.
    pub fn progress(&self) -> Option<Progress> {
        match (&self.digest, self.completed, self.total) {
            (Some(digest), Some(completed), Some(total)) => Some(Progress {
                digest: digest.clone(),
                completed,
                total,
            }),
            _ => None,
        }
    }
}

/// A fragment of assistant reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentToken {
    /// The text, exactly as received after prefix stripping.
    pub text: String,
}

impl ContentToken {
    /// Wrap a piece of reply text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A fully classified stream record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Model download or setup progress.
    Status(StatusEvent),
    /// Reply text.
    Content(ContentToken),
    /// The `[END]` sentinel.
    EndOfStream,
}

impl Event {
    /// Shorthand for a content event.
    pub fn content(text: impl Into<String>) -> Self {
        Self::Content(ContentToken::new(text))
    }

    /// Shorthand for a message-only status event.
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status(StatusEvent::message(message))
    }
}

/// Download progress for one layer digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Layer digest, e.g. `sha256:abc`.
    pub digest: String,
    /// Bytes completed.
    pub completed: u64,
    /// Bytes expected. Zero renders as `0.00%`.
    pub total: u64,
}

impl Progress {
    /// Completion percentage in `0.0..=100.0` for well-formed counters.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}%", self.digest, self.percent())
    }
}

/// Where a chat turn is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing received yet.
    #[default]
    Idle,
    /// Reply text is arriving.
    Streaming,
    /// The backend is pulling the model before it can answer.
    DownloadingModel,
    /// The reply is complete and frozen.
    Done,
    /// The turn failed. Terminal.
    Failed,
}

impl Phase {
    /// `Done` and `Failed` accept no further events.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Streaming => "streaming",
            Self::DownloadingModel => "downloading_model",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Presentation state of a single chat turn.
///
/// `displayed_prefix` is always a prefix of `accumulated_reply`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Current phase.
    pub phase: Phase,
    /// Every piece of reply text received so far.
    pub accumulated_reply: String,
    /// The part of the reply the reveal animation has shown.
    pub displayed_prefix: String,
    /// Latest progress per digest, in first-seen order.
    pub progress: Vec<Progress>,
    /// Status messages in arrival order (the terminal view).
    pub status_log: Vec<String>,
    /// User-facing failure message once `phase` is `Failed`.
    pub error: Option<String>,
    /// Set when a completed download asks the caller to start fresh.
    pub reset_after: Option<Duration>,
}

impl SessionState {
    /// Text received but not yet revealed.
    pub fn pending_reveal(&self) -> &str {
        &self.accumulated_reply[self.displayed_prefix.len()..]
    }

    /// Progress entry for a digest, if one has been seen.
    pub fn progress_for(&self, digest: &str) -> Option<&Progress> {
        self.progress.iter().find(|p| p.digest == digest)
    }
}

/// A change the presentation layer should render.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// The phase moved.
    Phase {
        /// Previous phase.
        from: Phase,
        /// New phase.
        to: Phase,
    },
    /// A status line for the terminal view.
    Status(String),
    /// Progress for a digest changed.
    Progress(Progress),
    /// Text appended to the reply (separator included).
    Appended(String),
    /// The caller should reset the session after this delay.
    ResetScheduled(Duration),
    /// The reply is final.
    Finished(String),
    /// The turn failed with this user-facing message.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_formats_two_decimals() {
        let p = Progress {
            digest: "sha256:abc".into(),
            completed: 50,
            total: 200,
        };
        assert_eq!(p.to_string(), "sha256:abc: 25.00%");
    }

    #[test]
    fn progress_rounds_to_two_decimals() {
        let p = Progress {
            digest: "d".into(),
            completed: 1,
            total: 3,
        };
        assert_eq!(p.to_string(), "d: 33.33%");
    }

    #[test]
    fn zero_total_is_zero_percent() {
        let p = Progress {
            digest: "d".into(),
            completed: 5,
            total: 0,
        };
        assert_eq!(p.to_string(), "d: 0.00%");
    }

    #[test]
    fn status_progress_requires_full_triple() {
        let mut s = StatusEvent {
            digest: Some("sha256:x".into()),
            completed: Some(10),
            ..Default::default()
        };
        assert!(s.progress().is_none());
        s.total = Some(100);
        assert_eq!(s.progress().map(|p| p.percent()), Some(10.0));
    }

    #[test]
    fn terminal_phases() {
        assert!(Phase::Done.is_terminal());
        assert!(Phase::Failed.is_terminal());
        assert!(!Phase::Idle.is_terminal());
        assert!(!Phase::Streaming.is_terminal());
        assert!(!Phase::DownloadingModel.is_terminal());
    }

    #[test]
    fn pending_reveal_is_suffix() {
        let state = SessionState {
            accumulated_reply: "Hello".into(),
            displayed_prefix: "He".into(),
            ..Default::default()
        };
        assert_eq!(state.pending_reveal(), "llo");
    }
}
