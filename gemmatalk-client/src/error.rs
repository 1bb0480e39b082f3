//! Internal error helpers for mapping HTTP/reqwest errors to [`ChatError`].

use gemmatalk_types::ChatError;

/// Map a non-2xx response to a [`ChatError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ChatError {
    ChatError::Http {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

/// Map a [`reqwest::Error`] to a [`ChatError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ChatError {
    if err.is_decode() {
        ChatError::Decode(err.to_string())
    } else {
        ChatError::Network(Box::new(err))
    }
}

/// Fail with the status and body unless the response is 2xx.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.map_err(map_reqwest_error)?;
    Err(map_http_status(status, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_body_are_preserved() {
        let err = map_http_status(reqwest::StatusCode::NOT_FOUND, "no such route");
        assert!(
            matches!(err, ChatError::Http { status: 404, ref body } if body == "no such route")
        );
        assert!(err.is_transport());
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = map_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(err.is_retryable());
    }

    #[test]
    fn empty_body_preserved_in_error() {
        let err = map_http_status(reqwest::StatusCode::BAD_REQUEST, "");
        assert!(matches!(err, ChatError::Http { ref body, .. } if body.is_empty()));
    }
}
