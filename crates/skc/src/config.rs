//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use skc_core::{Error, Result};
use skc_lossless::LosslessConfig;
use skc_quantize::{QuantizeConfig, TrainingConfig, DEFAULT_CLUSTER_COUNT};
use skc_sparse::{SparsityConfig, DEFAULT_SPARSITY_FRACTION};
use std::path::Path;

/// Options for the standard sparsify / quantize / compress chain.
///
/// Every field is optional in serialized form; missing fields take their
/// defaults. K-means settings sit at the top level:
///
/// ```json
/// { "sparsity_fraction": 0.5, "cluster_count": 16, "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fraction of smallest-magnitude elements zeroed
    #[serde(default = "default_sparsity_fraction")]
    pub sparsity_fraction: f32,

    /// Number of k-means centroids
    #[serde(default = "default_cluster_count")]
    pub cluster_count: usize,

    /// Try Zstandard on the code payload
    #[serde(default = "default_compression_enabled")]
    pub compression_enabled: bool,

    /// Zstandard level
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,

    /// K-means iteration cap, tolerance and seed
    #[serde(flatten)]
    pub training: TrainingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sparsity_fraction: default_sparsity_fraction(),
            cluster_count: default_cluster_count(),
            compression_enabled: default_compression_enabled(),
            compression_level: default_compression_level(),
            training: TrainingConfig::default(),
        }
    }
}

fn default_sparsity_fraction() -> f32 {
    DEFAULT_SPARSITY_FRACTION
}

fn default_cluster_count() -> usize {
    DEFAULT_CLUSTER_COUNT
}

fn default_compression_enabled() -> bool {
    true
}

fn default_compression_level() -> i32 {
    skc_lossless::DEFAULT_LEVEL
}

impl PipelineConfig {
    /// Config for the given core options, defaults elsewhere.
    pub fn new(sparsity_fraction: f32, cluster_count: usize, compression_enabled: bool) -> Self {
        Self {
            sparsity_fraction,
            cluster_count,
            compression_enabled,
            ..Default::default()
        }
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Load a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Sparsity stage settings
    pub fn sparsity(&self) -> SparsityConfig {
        SparsityConfig::with_fraction(self.sparsity_fraction)
    }

    /// Quantization stage settings
    pub fn quantize(&self) -> QuantizeConfig {
        QuantizeConfig {
            cluster_count: self.cluster_count,
            training: self.training.clone(),
        }
    }

    /// Compression stage settings
    pub fn lossless(&self) -> LosslessConfig {
        LosslessConfig {
            enabled: self.compression_enabled,
            level: self.compression_level,
        }
    }

    /// Validate every stage's settings.
    pub fn validate(&self) -> Result<()> {
        self.sparsity().validate()?;
        self.quantize().validate()?;
        self.lossless().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = PipelineConfig::default();
        assert_eq!(config.sparsity_fraction, 0.1);
        assert_eq!(config.cluster_count, 6);
        assert!(config.compression_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config =
            PipelineConfig::from_json(r#"{ "cluster_count": 16, "seed": 7 }"#).unwrap();
        assert_eq!(config.cluster_count, 16);
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.max_iterations, 100);
        assert_eq!(config.sparsity_fraction, 0.1);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig::new(0.25, 8, false);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"max_iterations\""));
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            PipelineConfig::new(1.5, 8, true).validate(),
            Err(Error::Configuration(_))
        ));
        assert!(PipelineConfig::new(0.5, 0, true).validate().is_err());
        let bad_level = PipelineConfig {
            compression_level: 999,
            ..Default::default()
        };
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = PipelineConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.category(), "serialization");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skc.json");
        let config = PipelineConfig::new(0.3, 12, true);
        std::fs::write(&path, config.to_json().unwrap()).unwrap();

        assert_eq!(PipelineConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::from_file("/nonexistent/skc.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
