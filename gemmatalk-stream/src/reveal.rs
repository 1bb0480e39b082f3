//! Reveal pacing and the presentation collaborator.

use std::time::Duration;

use gemmatalk_types::Update;

/// How fast received text is revealed.
pub trait Pacer: Send + Sync {
    /// Pause before each revealed character. `None` reveals without waiting.
    fn char_delay(&self) -> Option<Duration>;
}

/// Character-by-character typing effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typewriter {
    interval: Duration,
}

impl Typewriter {
    /// Default pause between characters.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(20);

    /// A typewriter with a custom interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl Pacer for Typewriter {
    fn char_delay(&self) -> Option<Duration> {
        Some(self.interval)
    }
}

/// No pacing. For headless use and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Instant;

impl Pacer for Instant {
    fn char_delay(&self) -> Option<Duration> {
        None
    }
}

/// Receives everything a chat view needs to render a turn.
pub trait Presenter: Send {
    /// A state change.
    fn update(&mut self, update: &Update);

    /// One more character of the reply is visible. `displayed` is the whole
    /// visible prefix.
    fn reveal(&mut self, ch: char, displayed: &str) {
        let _ = (ch, displayed);
    }
}

/// Discards everything.
impl Presenter for () {
    fn update(&mut self, _update: &Update) {}
}

/// Records every update in order.
impl Presenter for Vec<Update> {
    fn update(&mut self, update: &Update) {
        self.push(update.clone());
    }
}
