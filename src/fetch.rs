//! GET-and-classify over the shared session.
//!
//! Every reply ends up as exactly one of:
//! - `Ok(None)`: nothing usable came back (transport failure, empty or
//!   undecodable body, falsy JSON, or no session could be created);
//! - `Ok(Some(data))`: the envelope said `"OK"` or code 200;
//! - `Err(ClientError::Remote { .. })`: the envelope reported a failure;
//! - `Err(ClientError::MalformedEnvelope { .. })`: a non-object body, or a
//!   success envelope without `data`.
//!
//! The HTTP status line is not consulted; providers send their error
//! envelopes with 4xx status lines.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionManager;

/// Status text that marks a successful envelope.
pub const STATUS_OK: &str = "OK";

/// Numeric code that marks a successful envelope.
pub const CODE_OK: i64 = 200;

/// Response envelope shared by both providers.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: Option<Value>,
    status: Option<Value>,
    data: Option<Value>,
}

impl Envelope {
    fn status_text(&self) -> String {
        match &self.status {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "unknown status".to_string(),
        }
    }

    fn code(&self) -> Option<i64> {
        match &self.code {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn is_success(&self) -> bool {
        matches!(&self.status, Some(Value::String(s)) if s == STATUS_OK)
            || self.code() == Some(CODE_OK)
    }
}

/// Fetches URLs through a shared [`SessionManager`] and classifies replies.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    sessions: Arc<SessionManager>,
}

impl ContentFetcher {
    /// Creates a fetcher owning a fresh session manager for `config`.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_sessions(Arc::new(SessionManager::new(config)))
    }

    /// Creates a fetcher over an existing, possibly shared, session manager.
    #[must_use]
    pub fn with_sessions(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.sessions.config()
    }

    /// Issues a GET to `url` and classifies the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] when the envelope reports failure and
    /// [`ClientError::MalformedEnvelope`] when a success envelope lacks
    /// `data` or the body is not a JSON object.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Option<Value>, ClientError> {
        let session = match self.sessions.acquire() {
            Ok(session) => session,
            Err(error) => {
                warn!(error = %error, url = %url, "No HTTP session; treating as no content");
                return Ok(None);
            }
        };

        let response = match session.client().get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, session_id = session.id(), "Request failed");
                return Ok(None);
            }
        };

        let http_status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(error) => {
                warn!(error = %error, http_status, "Reading response body failed");
                return Ok(None);
            }
        };

        debug!(http_status, bytes = body.len(), "Response received");
        classify_body(url, &body)
    }
}

/// Classifies a raw response body.
///
/// # Errors
///
/// See [`ContentFetcher::fetch`].
pub fn classify_body(url: &str, body: &[u8]) -> Result<Option<Value>, ClientError> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(error) => {
            debug!(url = %url, error = %error, "Body is empty or not JSON");
            return Ok(None);
        }
    };

    if is_falsy(&value) {
        debug!(url = %url, "Body decoded to an empty value");
        return Ok(None);
    }
    if !value.is_object() {
        return Err(ClientError::malformed(
            url,
            "expected a JSON object envelope",
        ));
    }

    let envelope: Envelope = serde_json::from_value(value)
        .map_err(|e| ClientError::malformed(url, format!("unreadable envelope: {e}")))?;

    if envelope.is_success() {
        return envelope
            .data
            .ok_or_else(|| ClientError::malformed(url, "success envelope without `data`"))
            .map(Some);
    }

    let code = envelope.code();
    let status = envelope.status_text();
    info!(code = ?code, status = %status, url = %url, "Provider reported an error");
    Err(ClientError::remote(code, status))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const URL: &str = "http://api.test/v1/methods";

    fn classify(value: &Value) -> Result<Option<Value>, ClientError> {
        classify_body(URL, value.to_string().as_bytes())
    }

    #[test]
    fn test_ok_envelope_returns_data() {
        let data = json!({"timings": {"Fajr": "05:31"}});
        let result = classify(&json!({"code": 200, "status": "OK", "data": data})).unwrap();
        assert_eq!(result, Some(data));
    }

    #[test]
    fn test_code_200_alone_is_success() {
        let result = classify(&json!({"code": 200, "status": "Created", "data": [1, 2]})).unwrap();
        assert_eq!(result, Some(json!([1, 2])));
    }

    #[test]
    fn test_status_ok_alone_is_success() {
        let result = classify(&json!({"status": "OK", "data": "x"})).unwrap();
        assert_eq!(result, Some(json!("x")));
    }

    #[test]
    fn test_error_envelope_raises_remote_with_status() {
        let err = classify(&json!({"code": 400, "status": "Bad Request"})).unwrap_err();
        assert!(matches!(
            &err,
            ClientError::Remote { code: Some(400), status } if status == "Bad Request"
        ));
    }

    #[test]
    fn test_error_envelope_without_status_text() {
        let err = classify(&json!({"code": 500, "data": "boom"})).unwrap_err();
        assert_eq!(err.remote_status(), Some("unknown status"));
    }

    #[test]
    fn test_empty_and_unparseable_bodies_are_no_content() {
        assert!(classify_body(URL, b"").unwrap().is_none());
        assert!(classify_body(URL, b"   ").unwrap().is_none());
        assert!(classify_body(URL, b"<html>502</html>").unwrap().is_none());
        assert!(classify_body(URL, b"{\"code\": 200,").unwrap().is_none());
    }

    #[test]
    fn test_falsy_json_is_no_content() {
        for body in [json!(null), json!({}), json!([]), json!(""), json!(false), json!(0)] {
            assert!(classify(&body).unwrap().is_none(), "{body} should be no content");
        }
    }

    #[test]
    fn test_success_without_data_is_malformed() {
        let err = classify(&json!({"code": 200, "status": "OK"})).unwrap_err();
        assert!(matches!(err, ClientError::MalformedEnvelope { .. }));
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        let err = classify(&json!([{"code": 200}])).unwrap_err();
        assert!(matches!(err, ClientError::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_string_code_is_read_as_number() {
        let result = classify(&json!({"code": "200", "status": "Done", "data": 1})).unwrap();
        assert_eq!(result, Some(json!(1)));

        let err = classify(&json!({"code": "404", "status": "Not Found"})).unwrap_err();
        assert!(matches!(err, ClientError::Remote { code: Some(404), .. }));
    }

    #[test]
    fn test_fetch_invalid_url_is_no_content() {
        let fetcher = ContentFetcher::new(ClientConfig::default());
        let result = tokio_test::block_on(fetcher.fetch("not-a-valid-url"));
        assert!(result.unwrap().is_none());
    }
}
