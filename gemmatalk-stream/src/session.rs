//! The presentation state machine for one chat turn.
//!
//! ```text
//! Idle ──content──▶ Streaming ◀──"success"── DownloadingModel
//!   │                  │  ▲                      ▲
//!   └──download start──┴──┼──────────────────────┘
//!                         │
//!      [END] / body end ──▶ Done        any error ──▶ Failed
//! ```
//!
//! [`Session`] is pure: it maps [`Event`]s to [`SessionState`] changes and
//! reports them as [`Update`]s. Rendering, timers and the reveal pacing
//! belong to the caller.

use std::time::Duration;

use gemmatalk_types::{ChatError, Event, Phase, Progress, SessionState, StatusEvent, Update};
use serde::{Deserialize, Serialize};

/// Tunables for [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inserted between two content records unless either side already
    /// has whitespace at the seam.
    ///
    /// The default `" "` suits a backend that sends one word per record. A
    /// backend that splits words or sends punctuation as its own record gets
    /// `"Hel lo , friend !"` from it; set `""` to concatenate records verbatim.
    pub record_separator: String,
    /// Delay before the caller should start fresh after a model download.
    pub reset_delay_ms: u64,
    /// Status substrings that mean the backend started pulling the model.
    ///
    /// These only drive phase changes. Which lines count as status at all is
    /// decided by `ClassifierConfig::status_patterns`.
    pub download_start: Vec<String>,
    /// Status substrings that mean the pull finished.
    pub download_finished: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            record_separator: " ".into(),
            reset_delay_ms: 3000,
            download_start: vec!["Model not found locally".into(), "pulling manifest".into()],
            download_finished: vec!["success".into()],
        }
    }
}

impl SessionConfig {
    /// [`SessionConfig::reset_delay_ms`] as a [`Duration`].
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

/// State machine from stream events to presentation state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    state: SessionState,
}

impl Session {
    /// A fresh `Idle` session with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh `Idle` session.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Consume the session, keeping its final state.
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Apply one event. Terminal sessions ignore everything.
    pub fn apply(&mut self, event: Event) -> Vec<Update> {
        if self.state.phase.is_terminal() {
            tracing::debug!(phase = %self.state.phase, event = ?event, "event after terminal phase ignored");
            return Vec::new();
        }
        match event {
            Event::Content(token) => self.on_content(token.text),
            Event::Status(status) => self.on_status(status),
            Event::EndOfStream => self.finish(),
        }
    }

    /// The transport completed: trim and freeze the reply.
    pub fn finish(&mut self) -> Vec<Update> {
        if self.state.phase.is_terminal() {
            return Vec::new();
        }
        let mut updates = Vec::new();
        let trimmed = self.state.accumulated_reply.trim_end().len();
        self.state.accumulated_reply.truncate(trimmed);
        self.state.displayed_prefix = self.state.accumulated_reply.clone();
        self.transition(Phase::Done, &mut updates);
        updates.push(Update::Finished(self.state.accumulated_reply.clone()));
        updates
    }

    /// The transport failed. The reply received so far is kept as is.
    pub fn fail(&mut self, error: &ChatError) -> Vec<Update> {
        if self.state.phase.is_terminal() {
            return Vec::new();
        }
        tracing::warn!(error = %error, phase = %self.state.phase, "chat turn failed");
        let message = error.user_message().to_string();
        let mut updates = Vec::new();
        self.state.error = Some(message.clone());
        self.transition(Phase::Failed, &mut updates);
        updates.push(Update::Failed(message));
        updates
    }

    /// Reveal the next received character. Returns `None` when the display
    /// has caught up.
    pub fn reveal_step(&mut self) -> Option<char> {
        let next = self.state.pending_reveal().chars().next()?;
        self.state.displayed_prefix.push(next);
        Some(next)
    }

    /// Reveal everything received so far at once.
    pub fn reveal_all(&mut self) {
        self.state.displayed_prefix = self.state.accumulated_reply.clone();
    }

    /// Discard the turn and return to `Idle`.
    pub fn reset(&mut self) {
        tracing::debug!(phase = %self.state.phase, "session reset");
        self.state = SessionState::default();
    }

    fn on_content(&mut self, text: String) -> Vec<Update> {
        let mut updates = Vec::new();
        if text.is_empty() {
            return updates;
        }
        if self.state.phase != Phase::Streaming {
            self.transition(Phase::Streaming, &mut updates);
        }
        let appended = self.join(text);
        self.state.accumulated_reply.push_str(&appended);
        updates.push(Update::Appended(appended));
        updates
    }

    fn on_status(&mut self, status: StatusEvent) -> Vec<Update> {
        let mut updates = Vec::new();

        if let Some(progress) = status.progress() {
            self.record_progress(progress.clone());
            updates.push(Update::Progress(progress));
        }

        let message = status.message;
        if message.is_empty() {
            return updates;
        }
        self.state.status_log.push(message.clone());
        updates.push(Update::Status(message.clone()));

        match self.state.phase {
            Phase::Idle | Phase::Streaming
                if matches_any(&self.config.download_start, &message) =>
            {
                self.transition(Phase::DownloadingModel, &mut updates);
            }
            Phase::DownloadingModel if matches_any(&self.config.download_finished, &message) => {
                self.transition(Phase::Streaming, &mut updates);
                let delay = self.config.reset_delay();
                self.state.reset_after = Some(delay);
                updates.push(Update::ResetScheduled(delay));
            }
            _ => {}
        }
        updates
    }

    fn record_progress(&mut self, progress: Progress) {
        match self
            .state
            .progress
            .iter_mut()
            .find(|p| p.digest == progress.digest)
        {
            Some(existing) => *existing = progress,
            None => self.state.progress.push(progress),
        }
    }

    fn join(&self, text: String) -> String {
        let reply = &self.state.accumulated_reply;
        let seam_has_space = reply.is_empty()
            || reply.ends_with(char::is_whitespace)
            || text.starts_with(char::is_whitespace);
        if seam_has_space {
            text
        } else {
            format!("{}{text}", self.config.record_separator)
        }
    }

    fn transition(&mut self, to: Phase, updates: &mut Vec<Update>) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        tracing::debug!(%from, %to, "session phase changed");
        self.state.phase = to;
        updates.push(Update::Phase { from, to });
    }
}

fn matches_any(patterns: &[String], message: &str) -> bool {
    patterns.iter().any(|p| message.contains(p.as_str()))
}
