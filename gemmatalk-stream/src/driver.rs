//! Runs a response body through reassembly, classification, the session
//! state machine and reveal pacing.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use gemmatalk_types::{ChatError, Line, Update};
use tokio_util::sync::CancellationToken;

use crate::classify::Classifier;
use crate::lines::LineBuffer;
use crate::reveal::{Pacer, Presenter, Typewriter};
use crate::session::Session;

/// Drives one chat turn from a byte stream.
///
/// Lines are processed strictly in order, and each line's reveal finishes
/// before the next chunk is read.
///
/// # Example
///
/// ```no_run
/// use gemmatalk_stream::{Driver, Instant, Session};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn demo() -> Result<(), gemmatalk_types::ChatError> {
/// let body = futures::stream::iter([Ok::<_, std::io::Error>(
///     bytes::Bytes::from_static(b"data: Hello\ndata: [END]\n"),
/// )]);
/// let mut session = Session::new();
/// let mut updates: Vec<gemmatalk_types::Update> = Vec::new();
/// Driver::new()
///     .pacer(Instant)
///     .run(body, &mut session, &mut updates, &CancellationToken::new())
///     .await?;
/// assert_eq!(session.state().accumulated_reply, "Hello");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Driver {
    classifier: Classifier,
    pacer: Arc<dyn Pacer>,
    idle_timeout: Option<Duration>,
}

impl Driver {
    /// Default window without any data before the turn fails.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

    /// Default classifier, 20 ms typewriter, 120 s idle timeout.
    pub fn new() -> Self {
        Self {
            classifier: Classifier::new(),
            pacer: Arc::new(Typewriter::default()),
            idle_timeout: Some(Self::DEFAULT_IDLE_TIMEOUT),
        }
    }

    /// Override the line classifier.
    #[must_use]
    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Override the reveal pacing.
    #[must_use]
    pub fn pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Arc::new(pacer);
        self
    }

    /// Override the idle timeout. `None` waits forever.
    #[must_use]
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Consume `body` into `session`, forwarding every update to `presenter`.
    ///
    /// - `[END]` or end of body finishes the session (`Done`); bytes after
    ///   `[END]` are not read.
    /// - A read error or idle timeout fails the session and returns the error.
    /// - Cancellation resets the session to `Idle` and returns
    ///   [`ChatError::Cancelled`].
    pub async fn run<S, E>(
        &self,
        body: S,
        session: &mut Session,
        presenter: &mut dyn Presenter,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let mut body = std::pin::pin!(body);
        let mut lines = LineBuffer::new();

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(abandon(session)),
                next = self.next_chunk(&mut body) => next,
            };
            let chunk = match next {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(e))) => {
                    return Err(fail(session, presenter, ChatError::Network(e.into())));
                }
                Ok(None) => break,
                Err(err) => return Err(fail(session, presenter, err)),
            };
            for line in lines.push(&chunk) {
                if self.handle_line(&line, session, presenter, cancel).await? {
                    return Ok(());
                }
            }
        }

        if let Some(line) = lines.finish() {
            tracing::debug!(bytes = line.text.len(), "flushing unterminated final line");
            if self.handle_line(&line, session, presenter, cancel).await? {
                return Ok(());
            }
        }
        forward(presenter, session.finish());
        Ok(())
    }

    async fn next_chunk<S>(&self, body: &mut S) -> Result<Option<S::Item>, ChatError>
    where
        S: Stream + Unpin,
    {
        match self.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, body.next())
                .await
                .map_err(|_| ChatError::ProtocolTimeout(limit)),
            None => Ok(body.next().await),
        }
    }

    /// Returns `true` once the session is terminal.
    async fn handle_line(
        &self,
        line: &Line,
        session: &mut Session,
        presenter: &mut dyn Presenter,
        cancel: &CancellationToken,
    ) -> Result<bool, ChatError> {
        let Some(event) = self.classifier.classify(&line.text) else {
            return Ok(false);
        };
        forward(presenter, session.apply(event));
        self.reveal(session, presenter, cancel).await?;
        Ok(session.phase().is_terminal())
    }

    async fn reveal(
        &self,
        session: &mut Session,
        presenter: &mut dyn Presenter,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError> {
        let delay = self.pacer.char_delay();
        while let Some(ch) = session.reveal_step() {
            presenter.reveal(ch, &session.state().displayed_prefix);
            if let Some(delay) = delay {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(abandon(session)),
                    () = tokio::time::sleep(delay) => {}
                }
            }
        }
        Ok(())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("classifier", &self.classifier)
            .field("char_delay", &self.pacer.char_delay())
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

fn forward(presenter: &mut dyn Presenter, updates: Vec<Update>) {
    for update in &updates {
        presenter.update(update);
    }
}

fn fail(session: &mut Session, presenter: &mut dyn Presenter, err: ChatError) -> ChatError {
    forward(presenter, session.fail(&err));
    err
}

fn abandon(session: &mut Session) -> ChatError {
    tracing::debug!(phase = %session.phase(), "chat turn cancelled");
    session.reset();
    ChatError::Cancelled
}
