//! Response interpretation
//!
//! Maps raw HTTP responses onto JSON values or structured API errors.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Error, Result};
use crate::state::AppState;

/// Reason phrase the backend uses to refuse outdated clients
pub const UPGRADE_REQUIRED: &str = "UPGRADE_REQUIRED";

/// Fallback shown when the backend gives no usable message
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Fully buffered HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub reason: Option<String>,
    pub url: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Buffer a reqwest response, keeping the server's reason phrase
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let reason = reason_phrase(&response);
        let url = response.url().to_string();
        let body = response.bytes().await.map_err(ApiError::from)?.to_vec();

        Ok(Self {
            status,
            reason,
            url,
            body,
        })
    }
}

/// Custom phrases are exposed by hyper as an extension; canonical ones are not
fn reason_phrase(response: &reqwest::Response) -> Option<String> {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .map(str::to_string)
        .or_else(|| response.status().canonical_reason().map(str::to_string))
}

fn must_update_app(response: &ApiResponse) -> bool {
    response.status == StatusCode::FORBIDDEN && response.reason.as_deref() == Some(UPGRADE_REQUIRED)
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Interpret a response.
///
/// - 204: `{}`
/// - 403 `UPGRADE_REQUIRED`: `{}`, and the must-update flag is raised
/// - other non-2xx: [`ApiError::Status`] with the parsed body
/// - other 2xx: the parsed JSON body
pub fn handle_api_response(response: &ApiResponse, state: &AppState) -> Result<serde_json::Value> {
    if response.status == StatusCode::NO_CONTENT {
        return Ok(empty_object());
    }

    if must_update_app(response) {
        log::warn!("Backend requires a client upgrade");
        state.set_must_update(true);
        return Ok(empty_object());
    }

    if !response.status.is_success() {
        let content = serde_json::from_slice(&response.body).unwrap_or(serde_json::Value::Null);
        return Err(ApiError::Status {
            status_code: response.status.as_u16(),
            content,
            message: format!(
                "Request to {} failed, code: {}",
                response.url,
                response.status.as_u16()
            ),
        }
        .into());
    }

    serde_json::from_slice(&response.body).map_err(|e| {
        ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", response.url, e))
            .into()
    })
}

/// Interpret a response and deserialize it into `T`
pub fn parse_api_response<T: DeserializeOwned>(response: &ApiResponse, state: &AppState) -> Result<T> {
    let value = handle_api_response(response, state)?;
    serde_json::from_value(value).map_err(|e| {
        ApiError::InvalidResponse(format!("Unexpected payload from {}: {}", response.url, e)).into()
    })
}

/// Whether the error is a backend status error
pub fn is_api_error(err: &Error) -> bool {
    matches!(err, Error::Api(ApiError::Status { .. }))
}

// a `code` counts when present and not null, false, zero or empty
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Message to show the user for a failed call.
///
/// Uses the backend's `message` when the error body carries both a `code`
/// and a `message`.
pub fn extract_api_error_message(err: &Error) -> String {
    if let Error::Api(ApiError::Status { content, .. }) = err {
        let has_code = content.get("code").is_some_and(is_truthy);
        let message = content.get("message").and_then(|v| v.as_str());
        if let (true, Some(message)) = (has_code, message) {
            return message.to_string();
        }
    }

    GENERIC_ERROR_MESSAGE.to_string()
}
