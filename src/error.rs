//! Error types for the ESG agent orchestrator

use serde::Serialize;
use thiserror::Error;

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestrationError>;

#[derive(Error, Debug)]
pub enum OrchestrationError {

    // =============================
    // Terminal Pipeline Errors
    // =============================

    /// Every signal source failed for the company.
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    #[error("Stage '{stage}' failed: {cause}")]
    StageFailed { stage: String, cause: String },

    #[error("No valid companies: none of [{}] could be analyzed", .0.join(", "))]
    NoValidCompanies(Vec<String>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // =============================
    // Internal Errors
    // =============================

    /// A single provider failed. Non-fatal inside acquisition.
    #[error("Provider error: {0}")]
    Provider(String),

    /// An agent rejected its inputs.
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Coarse error classification the transport layer maps to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Unprocessable,
    Internal,
}

impl OrchestrationError {
    pub fn stage_failed(stage: &str, cause: impl std::fmt::Display) -> Self {
        OrchestrationError::StageFailed {
            stage: stage.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestrationError::CompanyNotFound(_) => ErrorKind::NotFound,
            OrchestrationError::InvalidInput(_) => ErrorKind::InvalidInput,
            OrchestrationError::NoValidCompanies(_) => ErrorKind::Unprocessable,
            _ => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            OrchestrationError::CompanyNotFound(_) => "ESG_NOT_FOUND",
            OrchestrationError::InvalidInput(_) => "ESG_INVALID_INPUT",
            OrchestrationError::NoValidCompanies(_) => "ESG_NO_VALID_COMPANIES",
            OrchestrationError::Config(_) => "ESG_CONFIG_INVALID",
            _ => "ESG_PROCESSING_FAILED",
        }
    }
}
