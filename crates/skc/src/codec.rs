//! Tensor-level codec producing wire envelopes.

use crate::config::PipelineConfig;
use crate::envelope::NamedTensor;
use crate::pipeline::TransformationPipeline;
use skc_core::{CompressionStats, Result, Tensor};
use tracing::info;

/// Compresses named tensors into [`NamedTensor`] envelopes and back.
#[derive(Debug, Clone)]
pub struct TensorCodec {
    pipeline: TransformationPipeline,
}

impl TensorCodec {
    /// Wrap an existing pipeline.
    pub fn new(pipeline: TransformationPipeline) -> Self {
        Self { pipeline }
    }

    /// Build the standard pipeline from `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(TransformationPipeline::from_config(config)?))
    }

    /// Underlying pipeline.
    pub fn pipeline(&self) -> &TransformationPipeline {
        &self.pipeline
    }

    /// Compress `tensor` into an envelope.
    pub fn compress(
        &self,
        name: &str,
        round_number: u64,
        tensor: &Tensor,
        report: bool,
    ) -> Result<NamedTensor> {
        self.compress_with_stats(name, round_number, tensor, report)
            .map(|(envelope, _)| envelope)
    }

    /// [`compress`](Self::compress), also returning size statistics.
    pub fn compress_with_stats(
        &self,
        name: &str,
        round_number: u64,
        tensor: &Tensor,
        report: bool,
    ) -> Result<(NamedTensor, CompressionStats)> {
        let output = self.pipeline.forward_report(tensor)?;
        info!(
            tensor = name,
            round = round_number,
            lossless = output.lossless,
            "{}",
            output.stats.summary()
        );

        let envelope = NamedTensor {
            name: name.to_string(),
            round_number,
            lossless: output.lossless,
            report,
            data_bytes: output.payload,
            transformer_metadata: output.metadata,
        };
        Ok((envelope, output.stats))
    }

    /// Reconstruct the tensor an envelope carries.
    pub fn decompress(&self, envelope: &NamedTensor) -> Result<Tensor> {
        self.pipeline
            .backward(&envelope.data_bytes, envelope.transformer_metadata.clone())
    }
}
