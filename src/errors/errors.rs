use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::dberrors::DbError;

/// Main error type for the registry service
#[derive(Debug)]
pub enum ServiceError {
    // Request shape errors
    InvalidBody(String),
    InvalidId(String),
    MissingRequiredFields(Vec<&'static str>),
    NotAnInteger(Vec<&'static str>),
    NotAString(&'static str),
    ValidationError(String),

    // Existence errors
    PersonNotFound(String),
    PetNotFound(String),

    // Immutable field errors
    ImmutableField(&'static str),

    // Referential integrity (pet created for a person that does not exist)
    OwnerNotFound(String),

    // Database errors
    DatabaseError(String),
    DatabaseConnectionError,

    // Internal errors
    InternalServerError(String),
}

/// Error body sent to clients for 4xx responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// `'a'`, `'a' and 'b'`, `'a', 'b' and 'c'`
fn join_fields(fields: &[&'static str]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| format!("'{}'", f)).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::InvalidBody(reason) => {
                write!(f, "Request body must be a JSON object: {}", reason)
            }
            ServiceError::InvalidId(_) => write!(f, "Parameter 'id' must be an integer."),
            ServiceError::MissingRequiredFields(fields) => write!(
                f,
                "Required parameters were missing from the request: {}.",
                join_fields(fields)
            ),
            ServiceError::NotAnInteger(fields) if fields.len() == 1 => {
                write!(f, "Parameter {} must be an integer.", join_fields(fields))
            }
            ServiceError::NotAnInteger(fields) => {
                write!(f, "Parameters {} must be integers.", join_fields(fields))
            }
            ServiceError::NotAString(field) => write!(f, "Parameter '{}' must be a string.", field),
            ServiceError::ValidationError(msg) => write!(f, "{}", msg),

            ServiceError::PersonNotFound(id) => write!(f, "No person was found with the id {}.", id),
            ServiceError::PetNotFound(id) => write!(f, "No pet was found with the id {}.", id),

            ServiceError::ImmutableField(field) => {
                write!(f, "The parameter '{}' cannot be changed.", field)
            }

            ServiceError::OwnerNotFound(id) => write!(f, "No person was found with the id {}.", id),

            ServiceError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ServiceError::DatabaseConnectionError => write!(f, "Failed to connect to database"),

            ServiceError::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ServiceError::InvalidBody(_)
            | ServiceError::InvalidId(_)
            | ServiceError::MissingRequiredFields(_)
            | ServiceError::NotAnInteger(_)
            | ServiceError::NotAString(_)
            | ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,

            // 403 Forbidden
            ServiceError::ImmutableField(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            ServiceError::PersonNotFound(_)
            | ServiceError::PetNotFound(_)
            | ServiceError::OwnerNotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            ServiceError::DatabaseError(_)
            | ServiceError::DatabaseConnectionError
            | ServiceError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::InvalidBody(_) => "INVALID_BODY",
            ServiceError::InvalidId(_) => "INVALID_ID",
            ServiceError::MissingRequiredFields(_) => "MISSING_REQUIRED_FIELDS",
            ServiceError::NotAnInteger(_) => "NOT_AN_INTEGER",
            ServiceError::NotAString(_) => "NOT_A_STRING",
            ServiceError::ValidationError(_) => "VALIDATION_ERROR",

            ServiceError::PersonNotFound(_) => "PERSON_NOT_FOUND",
            ServiceError::PetNotFound(_) => "PET_NOT_FOUND",

            ServiceError::ImmutableField(_) => "IMMUTABLE_FIELD",

            ServiceError::OwnerNotFound(_) => "OWNER_NOT_FOUND",

            ServiceError::DatabaseError(_) => "DATABASE_ERROR",
            ServiceError::DatabaseConnectionError => "DATABASE_CONNECTION_ERROR",

            ServiceError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Implement IntoResponse for Axum integration
///
/// Server errors are logged here with full detail and sent to the client
/// with an empty body.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                code = self.error_code(),
                error = %self,
                "Unhandled error while processing request"
            );
            return status.into_response();
        }

        tracing::warn!(
            status = %status,
            code = self.error_code(),
            message = %self,
            "Request rejected"
        );

        let error_response = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Storage errors that reach the HTTP layer without being reclassified are unexpected
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionError(_) => ServiceError::DatabaseConnectionError,
            other => ServiceError::DatabaseError(other.to_string()),
        }
    }
}

/// Conversion from validation errors, keeping the first field message
impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Parameter '{}' was invalid.", field),
                })
            })
            .next()
            .unwrap_or_else(|| err.to_string());

        ServiceError::ValidationError(message)
    }
}

/// Type alias for Results using ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
