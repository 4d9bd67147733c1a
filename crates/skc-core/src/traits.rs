//! The reversible stage abstraction.
//!
//! ## Data Flow
//!
//! ```text
//! Dense(Tensor) ──sparsity──▶ Dense(Tensor) ──quantize──▶ Codes(Vec<u32>) ──lossless──▶ Bytes(Vec<u8>)
//! ```
//!
//! `backward` walks the same arrows in reverse.

use crate::error::{Error, Result};
use crate::metadata::TransformerMetadata;
use crate::tensor::Tensor;

/// Representation handed between stages.
#[derive(Debug, Clone, PartialEq)]
pub enum StageData {
    /// Floating-point tensor.
    Dense(Tensor),
    /// One small integer code per element.
    Codes(Vec<u32>),
    /// Opaque bytes.
    Bytes(Vec<u8>),
}

impl StageData {
    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            StageData::Dense(_) => "dense",
            StageData::Codes(_) => "codes",
            StageData::Bytes(_) => "bytes",
        }
    }

    /// Size of this representation in bytes.
    pub fn byte_len(&self) -> usize {
        match self {
            StageData::Dense(t) => t.byte_len(),
            StageData::Codes(c) => c.len() * std::mem::size_of::<u32>(),
            StageData::Bytes(b) => b.len(),
        }
    }

    /// Unwrap a dense tensor or report which stage got the wrong kind.
    pub fn into_dense(self, stage: &'static str) -> Result<Tensor> {
        match self {
            StageData::Dense(t) => Ok(t),
            other => Err(Error::UnexpectedInput {
                stage,
                expected: "dense",
                actual: other.kind(),
            }),
        }
    }

    /// Unwrap a code array.
    pub fn into_codes(self, stage: &'static str) -> Result<Vec<u32>> {
        match self {
            StageData::Codes(c) => Ok(c),
            other => Err(Error::UnexpectedInput {
                stage,
                expected: "codes",
                actual: other.kind(),
            }),
        }
    }

    /// Unwrap a byte buffer.
    pub fn into_bytes(self, stage: &'static str) -> Result<Vec<u8>> {
        match self {
            StageData::Bytes(b) => Ok(b),
            other => Err(Error::UnexpectedInput {
                stage,
                expected: "bytes",
                actual: other.kind(),
            }),
        }
    }
}

/// Result of one stage's forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    /// Transformed data, input to the next stage.
    pub data: StageData,
    /// Record the matching `backward` needs.
    pub metadata: TransformerMetadata,
    /// Whether `backward` will reproduce the input bit for bit.
    pub exact: bool,
}

impl StageOutput {
    /// Bundle a stage result.
    pub fn new(data: StageData, metadata: TransformerMetadata, exact: bool) -> Self {
        Self {
            data,
            metadata,
            exact,
        }
    }
}

/// One reversible step of the compression chain.
///
/// Implementations hold only read-only configuration, so a single instance
/// may serve many concurrent callers.
pub trait Transformer: Send + Sync {
    /// Short stage name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Whether this stage can discard information.
    fn is_lossy(&self) -> bool;

    /// Transform `data` and emit the metadata needed to undo it.
    fn forward(&self, data: StageData) -> Result<StageOutput>;

    /// Undo `forward` using the record it emitted.
    fn backward(&self, data: StageData, metadata: &TransformerMetadata) -> Result<StageData>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_input() {
        let data = StageData::Bytes(vec![1, 2, 3]);
        let err = data.into_codes("cluster_quantize").unwrap_err();
        match err {
            Error::UnexpectedInput {
                stage,
                expected,
                actual,
            } => {
                assert_eq!(stage, "cluster_quantize");
                assert_eq!(expected, "codes");
                assert_eq!(actual, "bytes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_byte_len() {
        assert_eq!(StageData::Codes(vec![1, 2]).byte_len(), 8);
        assert_eq!(StageData::Bytes(vec![0; 5]).byte_len(), 5);
        assert_eq!(StageData::Dense(Tensor::from_vec(vec![0.0; 3])).byte_len(), 12);
    }
}
