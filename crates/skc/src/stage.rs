//! Closed set of pipeline stages.

use skc_core::{Result, StageData, StageOutput, TransformerMetadata, Transformer};
use skc_lossless::LosslessCompressTransformer;
use skc_quantize::ClusterQuantizeTransformer;
use skc_sparse::SparsityTransformer;

/// Kind of data a stage consumes or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Floating-point tensor.
    Dense,
    /// Integer codes.
    Codes,
    /// Opaque bytes.
    Bytes,
}

impl DataKind {
    /// Name matching [`StageData::kind`].
    pub fn name(self) -> &'static str {
        match self {
            DataKind::Dense => "dense",
            DataKind::Codes => "codes",
            DataKind::Bytes => "bytes",
        }
    }
}

/// One configured stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Magnitude sparsification.
    Sparsity(SparsityTransformer),
    /// K-means codebook quantization.
    ClusterQuantize(ClusterQuantizeTransformer),
    /// Varint layout plus Zstandard.
    LosslessCompress(LosslessCompressTransformer),
}

impl Stage {
    /// Data kind `forward` accepts.
    pub fn input_kind(&self) -> DataKind {
        match self {
            Stage::Sparsity(_) | Stage::ClusterQuantize(_) => DataKind::Dense,
            Stage::LosslessCompress(_) => DataKind::Codes,
        }
    }

    /// Data kind `forward` produces.
    pub fn output_kind(&self) -> DataKind {
        match self {
            Stage::Sparsity(_) => DataKind::Dense,
            Stage::ClusterQuantize(_) => DataKind::Codes,
            Stage::LosslessCompress(_) => DataKind::Bytes,
        }
    }

    /// Whether this stage records the tensor shape.
    pub fn records_shape(&self) -> bool {
        matches!(self, Stage::Sparsity(_))
    }

    /// Whether `backward` returns a flattened tensor.
    pub fn flattens(&self) -> bool {
        matches!(self, Stage::ClusterQuantize(_))
    }
}

impl Transformer for Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Sparsity(t) => t.name(),
            Stage::ClusterQuantize(t) => t.name(),
            Stage::LosslessCompress(t) => t.name(),
        }
    }

    fn is_lossy(&self) -> bool {
        match self {
            Stage::Sparsity(t) => t.is_lossy(),
            Stage::ClusterQuantize(t) => t.is_lossy(),
            Stage::LosslessCompress(t) => t.is_lossy(),
        }
    }

    fn forward(&self, data: StageData) -> Result<StageOutput> {
        match self {
            Stage::Sparsity(t) => t.forward(data),
            Stage::ClusterQuantize(t) => t.forward(data),
            Stage::LosslessCompress(t) => t.forward(data),
        }
    }

    fn backward(&self, data: StageData, metadata: &TransformerMetadata) -> Result<StageData> {
        match self {
            Stage::Sparsity(t) => t.backward(data, metadata),
            Stage::ClusterQuantize(t) => t.backward(data, metadata),
            Stage::LosslessCompress(t) => t.backward(data, metadata),
        }
    }
}

impl From<SparsityTransformer> for Stage {
    fn from(t: SparsityTransformer) -> Self {
        Stage::Sparsity(t)
    }
}

impl From<ClusterQuantizeTransformer> for Stage {
    fn from(t: ClusterQuantizeTransformer) -> Self {
        Stage::ClusterQuantize(t)
    }
}

impl From<LosslessCompressTransformer> for Stage {
    fn from(t: LosslessCompressTransformer) -> Self {
        Stage::LosslessCompress(t)
    }
}
