//! HTTP mapping for domain errors.
//!
//! Handlers wrap every `AppError` in an [`ApiError`] carrying a short
//! context message ("Failed to fetch materials"). The status code follows the
//! error kind; storage internals only reach the body in development mode.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use smh_core::error::{AppError, REQUIRED_FIELDS};
use smh_core::models::{MaterialType, Semester};

#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    source: AppError,
    detailed: bool,
}

impl ApiError {
    pub fn new(context: &'static str, source: AppError, detailed: bool) -> Self {
        Self {
            context,
            source,
            detailed,
        }
    }

    /// Body or query string that could not be decoded at all.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new("Malformed payload", AppError::Validation(message.into()), false)
    }

    pub fn source(&self) -> &AppError {
        &self.source
    }

    fn body(&self) -> Value {
        match &self.source {
            AppError::MissingFields(_) => json!({
                "error": "Missing required fields",
                "required": REQUIRED_FIELDS,
            }),
            AppError::InvalidType(_) => json!({
                "error": "Invalid type",
                "allowed": MaterialType::ALL,
            }),
            AppError::InvalidSemester(_) => json!({
                "error": "Invalid semester",
                "allowed": format!("{}-{}", Semester::MIN, Semester::MAX),
            }),
            AppError::Validation(message) => json!({
                "error": self.context,
                "message": message,
            }),
            AppError::NotFound(kind, _) => json!({
                "error": format!("{kind} not found"),
                "message": self.source.to_string(),
            }),
            AppError::Internal(message) => {
                let mut body = json!({
                    "error": self.context,
                    "message": "Internal server error",
                });
                if self.detailed {
                    body["message"] = json!(message);
                    body["details"] = json!(format!("{:?}", self.source));
                }
                body
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.source {
            AppError::MissingFields(_)
            | AppError::InvalidType(_)
            | AppError::InvalidSemester(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
