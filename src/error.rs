//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every core operation returns either a success value or one of these typed outcomes;
//! the transport layer never sees a panic for an expected failure.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers and middleware can
//! return it directly. Authentication failures are rendered with a uniform message and a
//! `WWW-Authenticate: Bearer` challenge, and store/internal failures are logged server-side
//! while the client only receives a generic body.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401). Bad credentials and invalid or
    /// expired tokens deliberately share this variant.
    Unauthorized(String),
    /// The caller is authenticated but does not own the addressed resource (HTTP 403).
    Forbidden(String),
    /// A client-side error due to a malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// Registration attempted with an email that already has an account (HTTP 400).
    DuplicateEmail,
    /// Registration attempted with a password shorter than the minimum length (HTTP 400).
    WeakPassword,
    /// The requested resource does not exist under the caller's ownership (HTTP 404).
    NotFound(String),
    /// Reserved for write conflicts other than duplicate emails (HTTP 409).
    Conflict(String),
    /// The caller exceeded the request rate policy (HTTP 429).
    TooManyRequests(String),
    /// Input failed payload validation (HTTP 422).
    ValidationError(String),
    /// An error originating from the persistence store (HTTP 500).
    DatabaseError(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::DuplicateEmail => write!(f, "Bad Request: Email already registered"),
            AppError::WeakPassword => write!(
                f,
                "Bad Request: Password must be at least {} characters long",
                crate::services::accounts::MIN_PASSWORD_LENGTH
            ),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::TooManyRequests(msg) => write!(f, "Too Many Requests: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message exposed to the client. Server-side failures are masked.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::TooManyRequests(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::DuplicateEmail => "Email already registered".to_string(),
            AppError::WeakPassword => format!(
                "Password must be at least {} characters long",
                crate::services::accounts::MIN_PASSWORD_LENGTH
            ),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::DuplicateEmail | AppError::WeakPassword => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(
            self,
            AppError::DatabaseError(_) | AppError::InternalServerError(_)
        ) {
            log::error!("{}", self);
        }

        let mut response = HttpResponse::build(self.status_code());
        if let AppError::Unauthorized(_) = self {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(json!({
            "error": self.public_message()
        }))
    }
}

/// Converts storage-port failures into `AppError`.
///
/// Unique violations surface as `Conflict`; callers that know which constraint was hit
/// (account registration) map them to a more specific variant first.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::UniqueViolation(msg) => AppError::Conflict(msg),
            StoreError::MissingOwner => AppError::NotFound("Account not found".into()),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Converts `sqlx::Error` into `AppError` by way of the storage-port classification.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        StoreError::from(error).into()
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Token encoding failures are server faults; decoding failures never reach this
/// conversion because `TokenService::verify` collapses them to `None`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to generate token: {}", error))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Failed to hash password: {}", error))
    }
}
