//! Unified error types for Lookout

use thiserror::Error;

/// Unified error type for all Lookout operations
#[derive(Error, Debug)]
pub enum LookoutError {
    // Browser session errors
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Timed out waiting for {0}")]
    WaitTimeout(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Input simulation failed: {0}")]
    Input(String),

    #[error("Screenshot capture failed: {0}")]
    Screenshot(String),

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    // Verification errors
    #[error("Assertion failed: {0}")]
    Assertion(String),

    // Scenario errors
    #[error("Invalid scenario: {0}")]
    Scenario(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using LookoutError
pub type Result<T> = std::result::Result<T, LookoutError>;
