// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for stack definition and synthesis

use thiserror::Error;

use crate::domain::{LogicalIdError, NetworkError, ValidationError};

/// Errors that can occur while defining or synthesizing stacks
#[derive(Debug, Error)]
pub enum StackError {
    /// Invalid network value (CIDR, port, zone count)
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Invalid logical ID or stack name
    #[error("Identifier error: {0}")]
    Identifier(#[from] LogicalIdError),

    /// Resource graph invariant violated
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Stack name already used in this app
    #[error("Stack already defined: {0}")]
    DuplicateStack(String),

    /// Stack name not found in this app
    #[error("Unknown stack: {0}")]
    UnknownStack(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem error while writing an assembly
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for stack operations
pub type StackResult<T> = Result<T, StackError>;

impl From<serde_json::Error> for StackError {
    fn from(err: serde_json::Error) -> Self {
        StackError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StackError {
    fn from(err: std::io::Error) -> Self {
        StackError::Io(err.to_string())
    }
}
