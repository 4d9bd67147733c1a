//! Error types for pipeline operations.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Pipeline error types.
#[derive(Debug, Error)]
pub enum Error {
    /// A stage parameter is out of range.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `backward` received a metadata list of the wrong length.
    #[error("metadata count mismatch: pipeline has {expected} stages, got {actual} records")]
    MetadataCountMismatch { expected: usize, actual: usize },

    /// A metadata record lacks a field its stage needs to invert itself.
    #[error("{stage}: metadata record is missing `{field}`")]
    MissingMetadata {
        stage: &'static str,
        field: &'static str,
    },

    /// A stage was handed a data kind it cannot process.
    #[error("{stage}: expected {expected} input, got {actual}")]
    UnexpectedInput {
        stage: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Element count does not agree with a shape.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Any other broken forward/backward contract.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Input values the pipeline cannot represent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Payload bytes could not be decoded.
    #[error("corrupted data: {0}")]
    CorruptedData(String),

    /// Envelope or config (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData(message.into())
    }

    /// Create a corrupted data error with offset context.
    pub fn corrupted_at(message: impl Into<String>, offset: usize) -> Self {
        Error::CorruptedData(format!("{} at offset {}", message.into(), offset))
    }

    /// Create a missing metadata field error.
    pub fn missing(stage: &'static str, field: &'static str) -> Self {
        Error::MissingMetadata { stage, field }
    }

    /// Create a contract violation error.
    pub fn contract(message: impl Into<String>) -> Self {
        Error::ContractViolation(message.into())
    }

    /// Check whether this error means the caller broke the forward/backward contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::MetadataCountMismatch { .. }
                | Error::MissingMetadata { .. }
                | Error::UnexpectedInput { .. }
                | Error::ShapeMismatch { .. }
                | Error::ContractViolation(_)
        )
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::MetadataCountMismatch { .. } => "metadata_count_mismatch",
            Error::MissingMetadata { .. } => "missing_metadata",
            Error::UnexpectedInput { .. } => "unexpected_input",
            Error::ShapeMismatch { .. } => "shape_mismatch",
            Error::ContractViolation(_) => "contract_violation",
            Error::InvalidInput(_) => "invalid_input",
            Error::CorruptedData(_) => "corrupted_data",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io_error",
        }
    }
}
