//! # ClientError
//!
//! Failures surfaced to the client UI. An HTTP error status carries the
//! server's JSON body; transport failures are split by whether a response
//! ever arrived.

use serde_json::Value;
use smh_core::error::AppError;
use thiserror::Error;

const FALLBACK_MESSAGE: &str = "An error occurred";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: String,
        code: String,
        body: Value,
    },

    /// The request was sent but no response came back.
    #[error("Network error - no response received from server: {0}")]
    Network(String),

    /// The request could not be built.
    #[error("Request error: {0}")]
    Request(String),

    /// A 2xx response whose body was not the expected JSON.
    #[error("unreadable response body: {0}")]
    Decode(String),

    /// Mutations through the catalog require an admin session.
    #[error("admin session required")]
    Unauthorized,

    #[error(transparent)]
    Domain(#[from] AppError),
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

impl ClientError {
    /// Builds the error for an error status. The message prefers the body's
    /// `message`, then its `error`.
    pub fn from_response(status: u16, body: Value) -> Self {
        let message = text_field(&body, "message")
            .or_else(|| text_field(&body, "error"))
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Self::Api {
            status,
            message,
            details: text_field(&body, "details").unwrap_or_default(),
            code: text_field(&body, "code").unwrap_or_default(),
            body,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Api { .. } => "APIError",
            Self::Network(_) => "NetworkError",
            Self::Request(_) => "RequestError",
            Self::Decode(_) => "DecodeError",
            Self::Unauthorized => "Unauthorized",
            Self::Domain(_) => "DomainError",
        }
    }

    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_prefers_message_then_error() {
        let err = ClientError::from_response(
            500,
            json!({ "error": "Failed to create material", "message": "disk full", "details": "ENOSPC" }),
        );
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.name(), "APIError");

        let err = ClientError::from_response(400, json!({ "error": "Invalid type", "allowed": ["PDF", "VIDEO"] }));
        assert_eq!(err.to_string(), "Invalid type");
        match err {
            ClientError::Api { details, code, body, .. } => {
                assert_eq!(details, "");
                assert_eq!(code, "");
                assert_eq!(body["allowed"], json!(["PDF", "VIDEO"]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_falls_back() {
        let err = ClientError::from_response(502, Value::Null);
        assert_eq!(err.to_string(), "An error occurred");
    }
}
