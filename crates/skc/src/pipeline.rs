//! Ordered composition of stages with an explicit metadata stack.
//!
//! ```text
//! forward:   tensor ─▶ stage 0 ─▶ stage 1 ─▶ … ─▶ stage N-1 ─▶ payload
//!                        │          │                 │
//!                        ▼          ▼                 ▼
//!            metadata = [ rec 0,    rec 1,     …,     rec N-1 ]
//!
//! backward:  payload ─▶ stage N-1 ─▶ … ─▶ stage 0 ─▶ tensor
//!                       pops rec N-1      pops rec 0
//! ```

use crate::config::PipelineConfig;
use crate::stage::{DataKind, Stage};
use skc_core::{
    CompressionStats, Error, Result, StageData, Tensor, TransformerMetadata, Transformer,
};
use skc_lossless::LosslessCompressTransformer;
use skc_quantize::ClusterQuantizeTransformer;
use skc_sparse::SparsityTransformer;
use std::time::Instant;
use tracing::debug;

/// Everything one forward pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Final stage's bytes.
    pub payload: Vec<u8>,
    /// One record per stage, in application order.
    pub metadata: Vec<TransformerMetadata>,
    /// Whether `backward` will reproduce the input exactly.
    pub lossless: bool,
    /// Sizes and timing.
    pub stats: CompressionStats,
}

/// Fixed, ordered list of stages.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct TransformationPipeline {
    stages: Vec<Stage>,
}

impl TransformationPipeline {
    /// Compose `stages`, checking that they chain from a dense tensor to
    /// bytes and that a shape-recording stage precedes any flattening one.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        if stages.is_empty() {
            return Err(Error::config("pipeline needs at least one stage"));
        }

        let mut kind = DataKind::Dense;
        let mut shape_recorded = false;
        for stage in &stages {
            if stage.input_kind() != kind {
                return Err(Error::config(format!(
                    "stage `{}` takes {} input but previous stage yields {}",
                    stage.name(),
                    stage.input_kind().name(),
                    kind.name()
                )));
            }
            if stage.flattens() && !shape_recorded {
                return Err(Error::config(format!(
                    "stage `{}` flattens the tensor; a sparsity stage must precede it to record the shape",
                    stage.name()
                )));
            }
            shape_recorded |= stage.records_shape();
            kind = stage.output_kind();
        }
        if kind != DataKind::Bytes {
            return Err(Error::config(format!(
                "pipeline must end in bytes, last stage yields {}",
                kind.name()
            )));
        }

        Ok(Self { stages })
    }

    /// The standard sparsify / quantize / compress chain.
    pub fn skc(sparsity_fraction: f32, cluster_count: usize, compression_enabled: bool) -> Result<Self> {
        Self::from_config(&PipelineConfig::new(
            sparsity_fraction,
            cluster_count,
            compression_enabled,
        ))
    }

    /// Build the standard chain from a config.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(vec![
            SparsityTransformer::from_config(config.sparsity())?.into(),
            ClusterQuantizeTransformer::from_config(config.quantize())?.into(),
            LosslessCompressTransformer::from_config(config.lossless())?.into(),
        ])
    }

    /// Configured stages in application order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; construction rejects empty pipelines.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Whether any stage can discard information.
    pub fn is_lossy(&self) -> bool {
        self.stages.iter().any(|s| s.is_lossy())
    }

    /// Run every stage in order.
    ///
    /// Returns the payload and exactly one metadata record per stage.
    pub fn forward(&self, tensor: &Tensor) -> Result<(Vec<u8>, Vec<TransformerMetadata>)> {
        let output = self.forward_report(tensor)?;
        Ok((output.payload, output.metadata))
    }

    /// [`forward`](Self::forward) plus exactness and size statistics.
    pub fn forward_report(&self, tensor: &Tensor) -> Result<PipelineOutput> {
        let start = Instant::now();
        let mut data = StageData::Dense(tensor.clone());
        let mut metadata = Vec::with_capacity(self.stages.len());
        let mut lossless = true;

        for stage in &self.stages {
            let bytes_in = data.byte_len();
            let out = stage.forward(data)?;
            debug!(
                stage = stage.name(),
                bytes_in,
                bytes_out = out.data.byte_len(),
                exact = out.exact,
                "forward stage"
            );
            lossless &= out.exact;
            metadata.push(out.metadata);
            data = out.data;
        }

        let payload = data.into_bytes("pipeline")?;
        let stats = CompressionStats::from_operation(
            tensor.byte_len(),
            payload.len(),
            start.elapsed().as_micros() as u64,
            self.stages.len(),
        );

        Ok(PipelineOutput {
            payload,
            metadata,
            lossless,
            stats,
        })
    }

    /// Undo [`forward`](Self::forward), last stage first.
    ///
    /// Fails before running any stage if `metadata` does not hold exactly
    /// one record per stage.
    pub fn backward(&self, payload: &[u8], mut metadata: Vec<TransformerMetadata>) -> Result<Tensor> {
        if metadata.len() != self.stages.len() {
            return Err(Error::MetadataCountMismatch {
                expected: self.stages.len(),
                actual: metadata.len(),
            });
        }

        let mut data = StageData::Bytes(payload.to_vec());
        for stage in self.stages.iter().rev() {
            let record = metadata
                .pop()
                .ok_or_else(|| Error::contract("metadata stack exhausted"))?;
            data = stage.backward(data, &record)?;
            debug!(stage = stage.name(), kind = data.kind(), "backward stage");
        }

        data.into_dense("pipeline")
    }
}
