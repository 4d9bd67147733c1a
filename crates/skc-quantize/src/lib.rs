//! Cluster Quantization
//!
//! Replaces floating-point elements with small integer codes into a
//! per-tensor codebook learned by 1-D k-means.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Cluster Quantization                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  forward:                                                    │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐                │
//! │  │ Dense   │ -> │ Distinct │ -> │ K-means  │ -> codebook    │
//! │  │ Tensor  │    │ non-zero │    │ (seeded) │                │
//! │  └─────────┘    └──────────┘    └──────────┘                │
//! │        └──────── nearest centroid ──────────-> codes        │
//! │                                                              │
//! │  backward:                                                   │
//! │  ┌─────────┐    ┌──────────┐                                 │
//! │  │ Codes   │ -> │ Table    │ -> flat Dense tensor            │
//! │  │         │    │ lookup   │                                 │
//! │  └─────────┘    └──────────┘                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Codebook Layout
//!
//! Code `0` is reserved for exact zeros and always decodes to `0.0`, so
//! elements zeroed by sparsification survive quantization untouched.
//! Codes `1..=k` index the centroids in ascending order.

mod codebook;
mod quantize;
mod training;

pub use codebook::{Codebook, ZERO_CODE};
pub use quantize::{ClusterQuantizeTransformer, QuantizeConfig, STAGE_NAME};
pub use training::{ClusterTrainer, TrainedClusters, TrainingConfig};

/// Default number of clusters
pub const DEFAULT_CLUSTER_COUNT: usize = 6;

/// Default seed for centroid initialization
pub const DEFAULT_SEED: u64 = 42;

/// Prelude for common imports
pub mod prelude {
    pub use super::{ClusterQuantizeTransformer, Codebook, QuantizeConfig, TrainingConfig};
}
