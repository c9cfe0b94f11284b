//! Typed error handling for the fleet backend
//!
//! Handlers never return bare `anyhow::Error`s: every failure is folded into
//! a [`FleetError`] that knows its HTTP status and a stable error code.
//!
//! # Error Categories
//!
//! - [`EntityError`]: a truck or contract lookup matched nothing
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ValidationError`]: malformed or out-of-range input
//! - [`StorageError`]: the persistence engine failed or is unreachable
//! - [`RequestError`]: the HTTP request could not be decoded
//!
//! # Example
//!
//! ```rust,ignore
//! use fleet::prelude::*;
//!
//! async fn fetch(service: &dyn TruckService, id: Uuid) -> FleetResult<Truck> {
//!     service.get(&id).await?.ok_or_else(|| EntityError::not_found::<Truck>(id).into())
//! }
//! ```

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::core::entity::Entity;

/// The main error type of the fleet backend
#[derive(Debug, Error)]
pub enum FleetError {
    /// Entity lookup errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Anything that does not fit a category above
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl FleetError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            FleetError::Entity(e) => e.status_code(),
            FleetError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FleetError::Validation(_) => StatusCode::BAD_REQUEST,
            FleetError::Storage(e) => e.status_code(),
            FleetError::Request(e) => e.status_code(),
            FleetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FleetError::Entity(e) => e.error_code(),
            FleetError::Config(_) => "CONFIG_ERROR",
            FleetError::Validation(_) => "VALIDATION_ERROR",
            FleetError::Storage(e) => e.error_code(),
            FleetError::Request(_) => "INVALID_REQUEST",
            FleetError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            FleetError::Entity(EntityError::NotFound { entity_type, key }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "key": key,
                }))
            }
            FleetError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            FleetError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({
                    "fields": [{ "field": field, "message": message }],
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for FleetError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity lookups
#[derive(Debug, Error)]
pub enum EntityError {
    /// Nothing matched the id or business key
    #[error("{entity_type} '{key}' not found")]
    NotFound { entity_type: String, key: String },
}

impl EntityError {
    /// Not-found error for an entity type, keyed by anything displayable
    /// (an id or a truck number)
    pub fn not_found<T: Entity>(key: impl ToString) -> Self {
        EntityError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            key: key.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse config file '{file}': {message}")]
    ParseError { file: String, message: String },

    /// Invalid value in configuration or environment
    #[error("Invalid value '{value}' for '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("Failed to read config file '{file}': {message}")]
    IoError { file: String, message: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation failed for '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation failed: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for FleetError {
    fn from(errors: validator::ValidationErrors) -> Self {
        FleetError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
///
/// Backends attach these to the `anyhow::Error` they return so the HTTP layer
/// can recover the category (see `From<anyhow::Error> for FleetError`).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// Stored data could not be mapped back to a record
    #[error("{backend} returned malformed data: {message}")]
    DataError { backend: String, message: String },

    /// Backend not reachable
    #[error("Storage backend '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::QueryError { .. } | StorageError::DataError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::QueryError { .. } => "STORAGE_ERROR",
            StorageError::DataError { .. } => "STORAGE_DATA_ERROR",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors produced while decoding an HTTP request
#[derive(Debug, Error)]
pub enum RequestError {
    /// Path segment could not be parsed (e.g. a non-UUID id)
    #[error("Invalid path parameter: {message}")]
    InvalidPath { message: String },

    /// Query string could not be parsed
    #[error("Invalid query parameters: {message}")]
    InvalidQuery { message: String },

    /// Body could not be parsed
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidPath { .. }
            | RequestError::InvalidQuery { .. }
            | RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<PathRejection> for FleetError {
    fn from(rejection: PathRejection) -> Self {
        FleetError::Request(RequestError::InvalidPath {
            message: rejection.body_text(),
        })
    }
}

impl From<QueryRejection> for FleetError {
    fn from(rejection: QueryRejection) -> Self {
        FleetError::Request(RequestError::InvalidQuery {
            message: rejection.body_text(),
        })
    }
}

impl From<JsonRejection> for FleetError {
    fn from(rejection: JsonRejection) -> Self {
        FleetError::Request(RequestError::InvalidBody {
            message: rejection.body_text(),
        })
    }
}

/// Recover a typed category from a service error
///
/// Services speak `anyhow`; backends wrap a [`StorageError`] when they know
/// what went wrong. Anything else becomes [`FleetError::Internal`].
impl From<anyhow::Error> for FleetError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StorageError>() {
            Ok(storage) => FleetError::Storage(storage),
            Err(err) => match err.downcast::<FleetError>() {
                Ok(fleet) => fleet,
                Err(err) => FleetError::Internal(format!("{:#}", err)),
            },
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for request handling
pub type FleetResult<T> = Result<T, FleetError>;
