//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every variant is rendered as the uniform envelope `{ "success": false, "message": ... }`
//! so clients can surface a message without inspecting status-specific shapes.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application errors
//! into HTTP responses. `From` implementations exist for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, `bcrypt::BcryptError`
//! and the repository `StoreError`, allowing for easy conversion using the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Message returned to clients for failures whose details stay in the server log.
const GENERIC_SERVER_MESSAGE: &str = "Server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed or expired credentials (HTTP 401).
    Unauthorized(String),
    /// Authenticated, but the session lacks the required role (HTTP 403).
    Forbidden(String),
    /// Malformed request or a violated business rule (HTTP 400).
    BadRequest(String),
    /// The referenced entity does not exist (HTTP 404).
    NotFound(String),
    /// Request body exceeds the accepted size (HTTP 413).
    PayloadTooLarge(String),
    /// Unexpected server-side error (HTTP 500). The message is logged, not returned.
    InternalServerError(String),
    /// Error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// The backing store cannot be reached (HTTP 503).
    ServiceUnavailable(String),
    /// Input validation failed (HTTP 422). Carries one message per offending field.
    ValidationError {
        message: String,
        fields: BTreeMap<String, String>,
    },
}

impl AppError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.to_string());
        AppError::ValidationError {
            message: "Validation failed".into(),
            fields,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            AppError::ValidationError { message, .. } => {
                write!(f, "Validation Error: {}", message)
            }
        }
    }
}

/// Converts `AppError` variants into `{ success: false, message }` responses.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::ValidationError { message, fields } => HttpResponse::build(status).json(json!({
                "success": false,
                "message": message,
                "errors": fields,
            })),
            // Internal details are logged here and never reach the client.
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("{}: {}", status, msg);
                HttpResponse::build(status).json(json!({
                    "success": false,
                    "message": GENERIC_SERVER_MESSAGE,
                }))
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::ServiceUnavailable(msg) => HttpResponse::build(status).json(json!({
                "success": false,
                "message": msg,
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`, pool exhaustion and
/// closed pools to `ServiceUnavailable`, everything else to `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => AppError::ServiceUnavailable(
                "Database not available. Please try again later.".into(),
            ),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`,
/// keeping the first message reported for each field.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let mut fields = BTreeMap::new();
        for (field, errors) in error.field_errors() {
            if let Some(first) = errors.first() {
                let message = match &first.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid ({})", field, first.code),
                };
                fields.insert(field.to_string(), message);
            }
        }
        let message = if fields.is_empty() {
            error.to_string()
        } else {
            "Validation failed".to_string()
        };
        AppError::ValidationError { message, fields }
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {:?}", error.kind()))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound(entity) => AppError::NotFound(format!("{} not found", entity)),
            StoreError::Conflict(msg) => AppError::BadRequest(msg),
            StoreError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            StoreError::Database(err) => AppError::from(err),
        }
    }
}
