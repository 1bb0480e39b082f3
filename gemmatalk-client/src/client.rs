//! GemmaTalk backend client struct and builder.

use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use gemmatalk_stream::{Classifier, Driver, Pacer, Presenter, Session, decode_stream};
use gemmatalk_types::{ChatError, ChatRequest, Event};
use tokio_util::sync::CancellationToken;

use crate::error::{check_status, map_reqwest_error};

/// Default backend base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default model, the first entry of the selector.
const DEFAULT_MODEL: &str = "llama3.2";

/// Default reply language.
const DEFAULT_LANGUAGE: &str = "en";

/// Client for the GemmaTalk backend.
///
/// # Example
///
/// ```no_run
/// use gemmatalk_client::ChatClient;
///
/// let client = ChatClient::new()
///     .base_url("http://127.0.0.1:8000")
///     .model("mistral")
///     .user_name("Sam");
/// ```
pub struct ChatClient {
    /// Backend base URL, without a trailing slash.
    pub(crate) base_url: String,
    /// Model used when a request does not name one.
    pub(crate) model: String,
    /// Language used when a request does not name one.
    pub(crate) language: String,
    /// User name used when a request does not carry one.
    pub(crate) user_name: String,
    /// Window without data (or without response headers) before failing.
    pub(crate) idle_timeout: Option<Duration>,
    /// Classifier for [`ChatClient::events`]; the driver holds a copy.
    pub(crate) classifier: Classifier,
    /// Turn driver.
    pub(crate) driver: Driver,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl ChatClient {
    /// Create a client with defaults.
    ///
    /// Base URL `http://localhost:8000`, model `llama3.2`, language `en`,
    /// 20 ms typewriter reveal, 120 s idle timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            language: DEFAULT_LANGUAGE.into(),
            user_name: String::new(),
            idle_timeout: Some(Driver::DEFAULT_IDLE_TIMEOUT),
            classifier: Classifier::new(),
            driver: Driver::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the backend base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the default model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the default reply language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the user name sent with every request.
    #[must_use]
    pub fn user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    /// Override the idle timeout. `None` waits forever.
    #[must_use]
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self.driver = self.driver.idle_timeout(timeout);
        self
    }

    /// Override the reveal pacing.
    #[must_use]
    pub fn pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.driver = self.driver.pacer(pacer);
        self
    }

    /// Override the line classifier.
    #[must_use]
    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.driver = self.driver.classifier(classifier.clone());
        self.classifier = classifier;
        self
    }

    /// Use a preconfigured [`reqwest::Client`].
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Build an endpoint URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fill request fields left empty with the client defaults.
    fn prepare(&self, mut request: ChatRequest) -> ChatRequest {
        if request.model.is_empty() {
            request.model = self.model.clone();
        }
        if request.language.is_empty() {
            request.language = self.language.clone();
        }
        if request.user_name.is_empty() {
            request.user_name = self.user_name.clone();
        }
        request
    }

    /// Post a chat request and return the raw response body.
    pub async fn open_stream(
        &self,
        request: ChatRequest,
    ) -> Result<BoxStream<'static, Result<Bytes, reqwest::Error>>, ChatError> {
        let url = self.url("/stream");
        let request = self.prepare(request);

        tracing::debug!(url = %url, model = %request.model, "sending chat request");

        let send = self.client.post(&url).json(&request).send();
        let response = match self.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| ChatError::ProtocolTimeout(limit))?,
            None => send.await,
        }
        .map_err(map_reqwest_error)?;

        let response = check_status(response).await?;
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Err(ChatError::MissingBody);
        }
        Ok(response.bytes_stream().boxed())
    }

    /// Post a chat request and decode the body into [`Event`]s without a
    /// session.
    pub async fn events(
        &self,
        request: ChatRequest,
    ) -> Result<BoxStream<'static, Result<Event, ChatError>>, ChatError> {
        let body = self.open_stream(request).await?;
        Ok(decode_stream(body, self.classifier.clone())
            .map(|item| item.map_err(map_reqwest_error))
            .boxed())
    }

    /// Run one chat turn into `session`.
    ///
    /// Any transport failure, including the request itself being rejected,
    /// leaves `session` in `Failed` with the fixed user-facing message and
    /// returns the underlying error. Cancellation resets `session`.
    pub async fn send(
        &self,
        request: ChatRequest,
        session: &mut Session,
        presenter: &mut dyn Presenter,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError> {
        let opened = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                session.reset();
                return Err(ChatError::Cancelled);
            }
            opened = self.open_stream(request) => opened,
        };

        match opened {
            Ok(body) => self.driver.run(body, session, presenter, cancel).await,
            Err(err) => {
                for update in session.fail(&err) {
                    presenter.update(&update);
                }
                Err(err)
            }
        }
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}
