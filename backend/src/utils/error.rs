use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_i18n::t;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use super::i18n::get_locale;

/// Reason a create/update request was rejected before touching storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKey {
    /// A new entity must not carry an id
    IdExists,
    /// The body of an update has no id
    IdNull,
    /// The body id differs from the path id
    IdInvalid,
    IdNotFound,
    /// A referenced entity does not exist
    ReferenceNotFound,
}

impl AlertKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdExists => "idexists",
            Self::IdNull => "idnull",
            Self::IdInvalid => "idinvalid",
            Self::IdNotFound => "idnotfound",
            Self::ReferenceNotFound => "referencenotfound",
        }
    }
}

/// API Error with rich context and automatic error trait implementations
///
/// Each variant carries enough context to render a localized message.
#[derive(Error, Debug)]
pub enum ApiError {
    // Resource errors 3xxx
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    // Validation errors 4xxx
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Request rejected for a specific entity, identified by a stable key
    /// the front end uses to pick its own translation.
    #[error("Bad request for {entity}: {}", .key.as_str())]
    BadRequestAlert { entity: &'static str, key: AlertKey },

    // System errors 5xxx
    #[error("Internal error: {0}")]
    InternalError(String),

    // Database errors - auto-convert from sqlx::Error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Generic wrapper for other errors - auto-convert from anyhow::Error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Helper to create internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// Helper to create validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Helper to create not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound(message.into())
    }

    pub fn bad_request_alert(entity: &'static str, key: AlertKey) -> Self {
        Self::BadRequestAlert { entity, key }
    }

    /// Numeric error code, grouped by category
    pub fn error_code(&self) -> i32 {
        match self {
            // Resource errors 3xxx
            Self::ResourceNotFound(_) => 3000,

            // Validation errors 4xxx
            Self::ValidationError(_) => 4001,
            Self::BadRequestAlert { .. } => 4003,

            // System errors 5xxx
            Self::InternalError(_) => 5001,
            Self::Database(_) => 5002,
            Self::Other(_) => 5001,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::BadRequestAlert { entity, key } => {
                Some(json!({ "entityName": entity, "errorKey": key.as_str() }))
            },
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get localized error message based on current locale
    pub fn localized_message(&self) -> String {
        let locale = get_locale();
        match self {
            Self::ResourceNotFound(name) => {
                t!("resource.not_found", locale = &locale, name = name).to_string()
            },
            Self::ValidationError(details) => {
                t!("validation.failed", locale = &locale, details = details).to_string()
            },
            Self::BadRequestAlert { entity, key } => match key {
                AlertKey::IdExists => t!("entity.idexists", locale = &locale, entity = entity),
                AlertKey::IdNull => t!("entity.idnull", locale = &locale, entity = entity),
                AlertKey::IdInvalid => t!("entity.idinvalid", locale = &locale, entity = entity),
                AlertKey::IdNotFound => t!("entity.idnotfound", locale = &locale, entity = entity),
                AlertKey::ReferenceNotFound => {
                    t!("entity.referencenotfound", locale = &locale, entity = entity)
                },
            }
            .to_string(),
            Self::InternalError(msg) => {
                t!("internal.error", locale = &locale, message = msg).to_string()
            },
            Self::Database(err) => {
                t!("database.error", locale = &locale, error = err.to_string()).to_string()
            },
            Self::Other(err) => {
                t!("internal.error", locale = &locale, message = err.to_string()).to_string()
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let message = self.localized_message();

        let status = match code {
            3000..=3999 => StatusCode::NOT_FOUND,
            4001..=4999 => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let response = ApiErrorResponse { code, message, details: self.details() };

        (status, Json(response)).into_response()
    }
}

/// Implement From for serde_json::Error
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal_error(format!("JSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::validation_error(errors.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
