//! Typed client for the portal's REST backend.
//!
//! Public routes (`/admissions`, the login endpoints) go out bare; everything
//! under `/admin` carries `Authorization: Bearer <token>`. Responses are
//! either the `{success, data, message}` envelope or a bare JSON value and
//! both are accepted.

mod admin;
mod admissions;
mod auth;
mod content;
pub mod types;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::admission::PayloadError;
use crate::config::ApiConfig;

pub use types::{
    ApplicationStatus, EducationEntry, EventDraft, EventRecord, FileRef, LoginGrant, LoginRequest,
    NewsArticle, NewsDraft, SubmittedApplication, Testimony, TestimonyStatus,
};

/// Longest plain-text error body echoed back to the user.
const MAX_PLAIN_ERROR_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{endpoint} could not be reached: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(
        "{endpoint} returned HTTP {status}: {}",
        message.as_deref().unwrap_or("no details given")
    )]
    Status {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    #[error("{endpoint} reported failure: {message}")]
    Unsuccessful { endpoint: String, message: String },
    #[error("{endpoint} response could not be decoded: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} response carried no data")]
    MissingData { endpoint: String },
    #[error("admin endpoints need a signed-in session")]
    Unauthenticated,
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl ApiError {
    /// The backend's own explanation when it sent one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Unsuccessful { message, .. } => message.clone(),
            ApiError::Payload(err) => err.to_string(),
            ApiError::Unauthenticated => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the portal backend.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    config: ApiConfig,
    token: Option<String>,
}

impl PortalClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client_init".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            config: config.clone(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.config.endpoint(path))
    }

    fn admin(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::Unauthenticated)?;
        Ok(self.public(method, path).bearer_auth(token))
    }

    /// Send and decode the response's data.
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(endpoint, request).await?;
        decode_body(endpoint, &body)
    }

    /// Send where only success matters (deletes, status transitions).
    async fn execute_ack(&self, endpoint: &str, request: RequestBuilder) -> Result<(), ApiError> {
        let body = self.send(endpoint, request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        match serde_json::from_slice::<Envelope>(&body) {
            Ok(Envelope {
                success: Some(false),
                message,
                ..
            }) => Err(unsuccessful(endpoint, message)),
            _ => Ok(()),
        }
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        debug!(endpoint, "portal request");
        let transport = |source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(endpoint, status = status.as_u16(), message = ?message, "portal request failed");
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }
}

fn decode_body<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T, ApiError> {
    let decode = |source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    };

    let value: Value = serde_json::from_slice(body).map_err(decode)?;
    let is_envelope = value
        .as_object()
        .is_some_and(|object| object.contains_key("success") || object.contains_key("data"));
    if !is_envelope {
        return serde_json::from_value(value).map_err(decode);
    }

    let envelope: Envelope = serde_json::from_value(value).map_err(decode)?;
    if envelope.success == Some(false) {
        return Err(unsuccessful(endpoint, envelope.message));
    }
    match envelope.data {
        None | Some(Value::Null) => Err(ApiError::MissingData {
            endpoint: endpoint.to_string(),
        }),
        Some(data) => serde_json::from_value(data).map_err(decode),
    }
}

fn unsuccessful(endpoint: &str, message: Option<String>) -> ApiError {
    ApiError::Unsuccessful {
        endpoint: endpoint.to_string(),
        message: message.unwrap_or_else(|| "request was not successful".to_string()),
    }
}

/// Pull a human-readable reason out of an error body: `message`, then
/// `error` (string or `{message}`), then short plain text.
fn error_message(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => {
            let text = |value: Option<&Value>| {
                value
                    .and_then(Value::as_str)
                    .filter(|text| !text.trim().is_empty())
                    .map(str::to_string)
            };
            text(value.get("message"))
                .or_else(|| text(value.get("error")))
                .or_else(|| text(value.get("error").and_then(|error| error.get("message"))))
        }
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            (!text.is_empty() && text.len() <= MAX_PLAIN_ERROR_LEN).then(|| text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_prefers_message_then_error() {
        let body = json!({ "message": "email already used", "error": "Unprocessable" });
        assert_eq!(
            error_message(body.to_string().as_bytes()).as_deref(),
            Some("email already used")
        );

        let body = json!({ "success": false, "error": "Invalid credentials" });
        assert_eq!(
            error_message(body.to_string().as_bytes()).as_deref(),
            Some("Invalid credentials")
        );

        let body = json!({ "error": { "message": "token expired" } });
        assert_eq!(
            error_message(body.to_string().as_bytes()).as_deref(),
            Some("token expired")
        );

        assert_eq!(error_message(b"Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message(json!({ "message": "   " }).to_string().as_bytes()), None);
    }

    #[test]
    fn error_message_is_passed_through_unaltered() {
        let body = json!({ "message": "  Email already used.\n" });
        assert_eq!(
            error_message(body.to_string().as_bytes()).as_deref(),
            Some("  Email already used.\n")
        );
        assert_eq!(error_message(b"{}"), None);
        assert_eq!(error_message(b""), None);
    }

    #[test]
    fn decode_accepts_envelope_and_bare_values() {
        let wrapped = json!({ "success": true, "data": [{ "id": "n1", "title": "Open day" }] });
        let news: Vec<NewsArticle> =
            decode_body("GET /admin/news", wrapped.to_string().as_bytes()).expect("envelope");
        assert_eq!(news[0].title, "Open day");

        let bare = json!([{ "id": "a1", "firstname": "Ada" }]);
        let apps: Vec<SubmittedApplication> =
            decode_body("GET /admissions", bare.to_string().as_bytes()).expect("bare list");
        assert_eq!(apps[0].firstname, "Ada");
    }

    #[test]
    fn decode_reports_unsuccessful_and_missing_data() {
        let failed = json!({ "success": false, "message": "Not allowed" });
        let err = decode_body::<Vec<NewsArticle>>("GET /admin/news", failed.to_string().as_bytes())
            .expect_err("success false is an error");
        assert_eq!(err.user_message("fallback"), "Not allowed");

        let empty = json!({ "success": true });
        let err = decode_body::<Vec<NewsArticle>>("GET /admin/news", empty.to_string().as_bytes())
            .expect_err("no data");
        assert!(matches!(err, ApiError::MissingData { .. }));
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn status_error_without_message_uses_fallback() {
        let err = ApiError::Status {
            endpoint: "POST /admissions".to_string(),
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to submit application"), "Failed to submit application");
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            err.to_string(),
            "POST /admissions returned HTTP 500: no details given"
        );
    }
}
