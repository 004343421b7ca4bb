//! Error types for the converter pipeline
//!
//! Per-source resolution failures are not errors: they degrade to warnings
//! on the shared context. The variants here cover the structural failures a
//! converter implementation may hit.

use thiserror::Error;

/// Converter error
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Core(#[from] plainpack_core::CoreError),

    #[error("Conversion failed: {0}")]
    Failed(String),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;
