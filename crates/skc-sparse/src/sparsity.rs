//! Sparsity stage: trims low-magnitude elements to exact zero.

use serde::{Deserialize, Serialize};
use skc_core::{Error, Result, StageData, StageOutput, Tensor, TransformerMetadata, Transformer};
use std::cmp::Ordering;
use tracing::debug;

use crate::DEFAULT_SPARSITY_FRACTION;

/// Stage name used in logs and errors
pub const STAGE_NAME: &str = "sparsity";

/// Widest distance from an integer at which `zero_count` still rounds.
const MAX_SNAP: f64 = 0.25;

/// Sparsity configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparsityConfig {
    /// Fraction of elements to zero out (0.0 - 1.0)
    #[serde(default = "default_fraction")]
    pub fraction: f32,
}

impl Default for SparsityConfig {
    fn default() -> Self {
        Self {
            fraction: default_fraction(),
        }
    }
}

fn default_fraction() -> f32 {
    DEFAULT_SPARSITY_FRACTION
}

impl SparsityConfig {
    /// Create config with specific fraction
    pub fn with_fraction(fraction: f32) -> Self {
        Self { fraction }
    }

    /// Check that the fraction lies in [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fraction) {
            return Err(Error::config(format!(
                "sparsity fraction must be in [0, 1], got {}",
                self.fraction
            )));
        }
        Ok(())
    }

    /// Number of elements zeroed out of `n`.
    ///
    /// `floor(fraction * n)`, snapped to the nearest integer when the product
    /// is within the representation error of an `f32` fraction (0.7 * 10 is
    /// 7, not 6). The snap window never exceeds 0.25.
    pub fn zero_count(&self, n: usize) -> usize {
        let exact = self.fraction as f64 * n as f64;
        let nearest = exact.round();
        let window = (exact.abs() * f32::EPSILON as f64 / 2.0).min(MAX_SNAP);
        let count = if (exact - nearest).abs() <= window {
            nearest
        } else {
            exact.floor()
        };
        (count.max(0.0) as usize).min(n)
    }
}

/// Zeroes the `fraction` of elements with the smallest magnitude.
#[derive(Debug, Clone)]
pub struct SparsityTransformer {
    config: SparsityConfig,
}

impl SparsityTransformer {
    /// Create a transformer zeroing `fraction` of each tensor.
    pub fn new(fraction: f32) -> Result<Self> {
        Self::from_config(SparsityConfig::with_fraction(fraction))
    }

    /// Create from a validated config.
    pub fn from_config(config: SparsityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configured fraction.
    pub fn fraction(&self) -> f32 {
        self.config.fraction
    }

    /// Configuration
    pub fn config(&self) -> &SparsityConfig {
        &self.config
    }

    /// Indices to zero, in ascending `(|x|, index)` order.
    ///
    /// The comparator is a total order, so the selected set depends only on
    /// the values and never on sort stability.
    pub fn select_indices(&self, values: &[f32]) -> Vec<usize> {
        let m = self.config.zero_count(values.len());
        if m == 0 {
            return Vec::new();
        }

        let by_magnitude = |a: &usize, b: &usize| -> Ordering {
            values[*a]
                .abs()
                .total_cmp(&values[*b].abs())
                .then(a.cmp(b))
        };

        let mut order: Vec<usize> = (0..values.len()).collect();
        if m < order.len() {
            order.select_nth_unstable_by(m - 1, by_magnitude);
            order.truncate(m);
        }
        order.sort_unstable_by(by_magnitude);
        order
    }
}

impl Transformer for SparsityTransformer {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn is_lossy(&self) -> bool {
        true
    }

    fn forward(&self, data: StageData) -> Result<StageOutput> {
        let tensor = data.into_dense(STAGE_NAME)?;
        let metadata = TransformerMetadata::new().with_shape(tensor.shape());
        let (shape, mut values) = tensor.into_parts();

        let selected = self.select_indices(&values);
        let mut dropped = 0usize;
        for &i in &selected {
            // Existing zeros keep their sign bit.
            if values[i] != 0.0 {
                dropped += 1;
                values[i] = 0.0;
            }
        }

        debug!(
            stage = STAGE_NAME,
            elements = values.len(),
            zeroed = selected.len(),
            dropped,
            "sparsified tensor"
        );

        let tensor = Tensor::new(shape, values)?;
        Ok(StageOutput::new(
            StageData::Dense(tensor),
            metadata,
            dropped == 0,
        ))
    }

    fn backward(&self, data: StageData, metadata: &TransformerMetadata) -> Result<StageData> {
        let tensor = data.into_dense(STAGE_NAME)?;
        let shape = metadata.shape(STAGE_NAME)?;

        let expected: usize = shape.iter().product();
        if tensor.numel() != expected {
            return Err(Error::ShapeMismatch {
                expected: shape,
                actual: tensor.shape().to_vec(),
            });
        }

        Ok(StageData::Dense(tensor.reshape(shape)?))
    }
}
