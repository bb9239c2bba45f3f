//! Error types for the ExamForge engine
//!
//! Provides a closed error taxonomy with:
//! - Distinct error kinds for configuration, validation, storage, and
//!   provider failure modes
//! - Machine-readable error codes alongside human messages
//! - A single `Result` alias used across the workspace
//!
//! Only configuration errors are meant to cross the engine boundary;
//! provider and accounting failures are absorbed by the enrichment
//! pipeline and surfaced as structured counters instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    InvalidFormat,

    // Configuration / resource errors (4xxx)
    PatternNotFound,
    NoPatternAvailable,
    QuestionNotFound,

    // Data scarcity (5xxx)
    DataScarcity,

    // Rate limiting (6xxx)
    ProviderRateLimited,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // External provider errors (8xxx)
    ProviderUnavailable,
    ProviderTimeout,
    ProviderResponseInvalid,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidFormat => 1002,

            // Configuration / resources (4xxx)
            ErrorCode::PatternNotFound => 4001,
            ErrorCode::NoPatternAvailable => 4002,
            ErrorCode::QuestionNotFound => 4003,

            // Data scarcity (5xxx)
            ErrorCode::DataScarcity => 5001,

            // Rate limits (6xxx)
            ErrorCode::ProviderRateLimited => 6001,

            // Database (7xxx)
            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            // Provider (8xxx)
            ErrorCode::ProviderUnavailable => 8001,
            ErrorCode::ProviderTimeout => 8002,
            ErrorCode::ProviderResponseInvalid => 8003,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    // Configuration errors (the only kinds that cross the engine boundary)
    #[error("Paper pattern not found: {id}")]
    PatternNotFound { id: String },

    #[error("No paper pattern available for {subject} class {grade_level}")]
    NoPatternAvailable {
        subject: String,
        grade_level: String,
    },

    #[error("Question not found: {id}")]
    QuestionNotFound { id: String },

    // Provider failures (absorbed per item by the enrichment pipeline)
    #[error("Text provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("Text provider timed out after {timeout_ms}ms")]
    ProviderTimeout { timeout_ms: u64 },

    #[error("Text provider rate limited{}", .retry_after_secs.map(|s| format!(", retry after {}s", s)).unwrap_or_default())]
    ProviderRateLimited { retry_after_secs: Option<u64> },

    #[error("Text provider returned an invalid response: {message}")]
    ProviderResponse { message: String },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            AppError::PatternNotFound { .. } => ErrorCode::PatternNotFound,
            AppError::NoPatternAvailable { .. } => ErrorCode::NoPatternAvailable,
            AppError::QuestionNotFound { .. } => ErrorCode::QuestionNotFound,
            AppError::ProviderUnavailable { .. } => ErrorCode::ProviderUnavailable,
            AppError::ProviderTimeout { .. } => ErrorCode::ProviderTimeout,
            AppError::ProviderRateLimited { .. } => ErrorCode::ProviderRateLimited,
            AppError::ProviderResponse { .. } => ErrorCode::ProviderResponseInvalid,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Whether this is a per-item provider failure the pipeline must absorb
    /// rather than propagate.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AppError::ProviderUnavailable { .. }
                | AppError::ProviderTimeout { .. }
                | AppError::ProviderRateLimited { .. }
                | AppError::ProviderResponse { .. }
        )
    }

    /// Whether this is a configuration error that should surface to callers
    /// immediately, with no retry.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::PatternNotFound { .. }
                | AppError::NoPatternAvailable { .. }
                | AppError::Configuration { .. }
        )
    }
}
