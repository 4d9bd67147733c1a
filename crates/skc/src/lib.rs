//! # SKC
//!
//! Reversible compression of model-update tensors for federated learning.
//!
//! A tensor goes through three stages, each recording what it needs to be
//! undone:
//!
//! | Stage | Input | Output | Records | Lossy |
//! |-------|-------|--------|---------|-------|
//! | Sparsity | dense | dense | shape (`int_sequence`) | yes |
//! | ClusterQuantize | dense | codes | codebook (`scalar_map`) | yes |
//! | LosslessCompress | codes | bytes | compressed flag (`bool_sequence`) | no |
//!
//! ## Quick Start
//!
//! ```ignore
//! use skc::{Tensor, TransformationPipeline};
//!
//! let pipeline = TransformationPipeline::skc(0.1, 6, true)?;
//! let tensor = Tensor::new(vec![1, 32], (0..32).map(|i| i as f32).collect())?;
//!
//! let (payload, metadata) = pipeline.forward(&tensor)?;
//! let restored = pipeline.backward(&payload, metadata)?;
//! assert_eq!(restored.shape(), tensor.shape());
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - batch helpers on the rayon thread pool (default)

mod codec;
mod config;
mod delta;
mod envelope;
mod pipeline;
mod stage;

#[cfg(feature = "parallel")]
mod parallel;

pub use codec::TensorCodec;
pub use config::PipelineConfig;
pub use delta::{apply_delta, generate_delta};
pub use envelope::NamedTensor;
pub use pipeline::{PipelineOutput, TransformationPipeline};
pub use stage::{DataKind, Stage};

#[cfg(feature = "parallel")]
pub use parallel::{compress_batch, decompress_batch, BatchReport};

// Re-export core traits and types
pub use skc_core::{
    CompressionStats, Error, Result, StageData, StageOutput, Tensor, Transformer,
    TransformerMetadata,
};
pub use skc_lossless::{LosslessCompressTransformer, LosslessConfig};
pub use skc_quantize::{
    ClusterQuantizeTransformer, ClusterTrainer, Codebook, QuantizeConfig, TrainingConfig,
};
pub use skc_sparse::{SparsityConfig, SparsityTransformer};

/// Prelude for common imports
pub mod prelude {
    pub use super::{
        NamedTensor, PipelineConfig, Stage, Tensor, TensorCodec, TransformationPipeline,
        Transformer, TransformerMetadata,
    };
}
