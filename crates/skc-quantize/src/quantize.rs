//! Cluster quantization stage

use crate::codebook::Codebook;
use crate::training::{ClusterTrainer, TrainingConfig};
use crate::DEFAULT_CLUSTER_COUNT;
use serde::{Deserialize, Serialize};
use skc_core::{Error, Result, StageData, StageOutput, Tensor, TransformerMetadata, Transformer};
use tracing::debug;

/// Stage name used in logs and errors
pub const STAGE_NAME: &str = "cluster_quantize";

/// Quantization configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizeConfig {
    /// Number of centroids besides the reserved zero code
    #[serde(default = "default_cluster_count")]
    pub cluster_count: usize,
    /// K-means settings
    #[serde(default)]
    pub training: TrainingConfig,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            cluster_count: default_cluster_count(),
            training: TrainingConfig::default(),
        }
    }
}

fn default_cluster_count() -> usize {
    DEFAULT_CLUSTER_COUNT
}

impl QuantizeConfig {
    /// Create config with a cluster count and default training settings
    pub fn with_clusters(cluster_count: usize) -> Self {
        Self {
            cluster_count,
            ..Default::default()
        }
    }

    /// Check cluster count and training settings.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_count == 0 {
            return Err(Error::config("cluster_count must be positive"));
        }
        if self.cluster_count >= u32::MAX as usize {
            return Err(Error::config(format!(
                "cluster_count {} does not fit in u32 codes",
                self.cluster_count
            )));
        }
        self.training.validate()
    }
}

/// Maps each element onto a per-tensor codebook learned by k-means.
#[derive(Debug, Clone)]
pub struct ClusterQuantizeTransformer {
    cluster_count: usize,
    trainer: ClusterTrainer,
}

impl ClusterQuantizeTransformer {
    /// Create a transformer with `cluster_count` centroids.
    pub fn new(cluster_count: usize) -> Result<Self> {
        Self::from_config(QuantizeConfig::with_clusters(cluster_count))
    }

    /// Create from a validated config.
    pub fn from_config(config: QuantizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cluster_count: config.cluster_count,
            trainer: ClusterTrainer::new(config.training),
        })
    }

    /// Configured number of clusters.
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Learn the codebook for `values`.
    ///
    /// Returns whether every value is reproduced bit for bit, which holds
    /// when no more distinct values exist than clusters and no `-0.0` is
    /// present. The zero code always decodes to `+0.0`.
    pub fn learn_codebook(&self, values: &[f32]) -> Result<(Codebook, bool)> {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "non-finite value {} at index {index}",
                values[index]
            )));
        }

        let signed_zero = values.iter().any(|v| *v == 0.0 && v.is_sign_negative());
        let (distinct, weights) = distinct_nonzero(values);
        if distinct.is_empty() {
            debug!(stage = STAGE_NAME, "all-zero input, codebook holds only the zero code");
            return Ok((Codebook::empty(), !signed_zero));
        }

        let fit = self.trainer.fit(&distinct, &weights, self.cluster_count)?;
        let exact = distinct.len() <= self.cluster_count && !signed_zero;
        debug!(
            stage = STAGE_NAME,
            distinct = distinct.len(),
            centroids = fit.centroids.len(),
            iterations = fit.iterations,
            converged = fit.converged,
            inertia = fit.inertia,
            "trained codebook"
        );

        Ok((Codebook::from_centroids(fit.centroids)?, exact))
    }
}

/// Ascending distinct non-zero values with their multiplicities.
fn distinct_nonzero(values: &[f32]) -> (Vec<f32>, Vec<u64>) {
    let mut nonzero: Vec<f32> = values.iter().copied().filter(|&v| v != 0.0).collect();
    nonzero.sort_by(f32::total_cmp);

    let mut distinct: Vec<f32> = Vec::new();
    let mut weights: Vec<u64> = Vec::new();
    for v in nonzero {
        match distinct.last() {
            Some(&last) if last == v => {
                if let Some(w) = weights.last_mut() {
                    *w += 1;
                }
            }
            _ => {
                distinct.push(v);
                weights.push(1);
            }
        }
    }
    (distinct, weights)
}

impl Transformer for ClusterQuantizeTransformer {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn is_lossy(&self) -> bool {
        true
    }

    fn forward(&self, data: StageData) -> Result<StageOutput> {
        let tensor = data.into_dense(STAGE_NAME)?;
        let values = tensor.data();

        let (codebook, exact) = self.learn_codebook(values)?;
        let codes: Vec<u32> = values.iter().map(|&v| codebook.encode(v)).collect();

        let metadata = TransformerMetadata::new().with_scalar_map(codebook.to_table());
        Ok(StageOutput::new(StageData::Codes(codes), metadata, exact))
    }

    fn backward(&self, data: StageData, metadata: &TransformerMetadata) -> Result<StageData> {
        let codes = data.into_codes(STAGE_NAME)?;
        let codebook = Codebook::from_table(metadata.table(STAGE_NAME)?)?;

        let values = codes
            .iter()
            .enumerate()
            .map(|(i, &code)| {
                codebook.decode(code).ok_or_else(|| {
                    Error::corrupted_at(
                        format!("code {code} outside codebook of {} entries", codebook.len() + 1),
                        i,
                    )
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        Ok(StageData::Dense(Tensor::from_vec(values)))
    }
}
