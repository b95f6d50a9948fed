//! Unified error handling for Locavia
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the application, with automatic HTTP response mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    // ==================== Business Logic Errors ====================
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Rental not found: {0}")]
    RentalNotFound(String),

    #[error("Tool {tool} is not available for rental (status: {status})")]
    ToolUnavailable { tool: String, status: String },

    #[error("Rental {rental} is already closed (status: {status})")]
    RentalClosed { rental: String, status: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Customer is blocked: {0}")]
    CustomerBlocked(String),

    #[error("Feature requires a higher plan tier: {0}")]
    PlanRestricted(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_) | AppError::InvalidInput(_) | AppError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }

            // 403 Forbidden
            AppError::CustomerBlocked(_) | AppError::PlanRestricted(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::ToolNotFound(_)
            | AppError::CustomerNotFound(_)
            | AppError::RentalNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::ToolUnavailable { .. }
            | AppError::RentalClosed { .. }
            | AppError::InvalidTransition { .. }
            | AppError::Conflict(_)
            | AppError::AlreadyExists(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::Migration(_) => "migration_error",
            AppError::ToolNotFound(_) => "tool_not_found",
            AppError::CustomerNotFound(_) => "customer_not_found",
            AppError::RentalNotFound(_) => "rental_not_found",
            AppError::ToolUnavailable { .. } => "tool_unavailable",
            AppError::RentalClosed { .. } => "rental_closed",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::CustomerBlocked(_) => "customer_blocked",
            AppError::PlanRestricted(_) => "plan_restricted",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::MissingField(_) => "missing_field",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ToolNotFound("123".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ToolUnavailable {
                tool: "drill".to_string(),
                status: "rented".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::CustomerBlocked("42".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::PlanRestricted("roi insights".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::MissingField("X-Tenant-Id".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::RentalClosed {
                rental: "AL0001".to_string(),
                status: "returned".to_string()
            }
            .error_code(),
            "rental_closed"
        );
        assert_eq!(
            AppError::InvalidTransition {
                from: "returned".to_string(),
                to: "cancelled".to_string()
            }
            .error_code(),
            "invalid_transition"
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = AppError::InvalidTransition {
            from: "sold".to_string(),
            to: "rented".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid status transition: sold -> rented");
    }
}
