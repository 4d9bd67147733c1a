//! Magnitude sparsification
//!
//! Zeroes the smallest-magnitude fraction of a tensor's elements so the
//! later quantization and entropy stages see fewer significant values.
//! The zeroed information is gone for good: this stage is lossy.
//!
//! ```text
//!  [0.9, -0.1, 0.05, 0.4]  ──fraction 0.5──▶  [0.9, 0.0, 0.0, 0.4]   int_sequence = [4]
//! ```

mod sparsity;

pub use sparsity::{SparsityConfig, SparsityTransformer, STAGE_NAME};

/// Default fraction of elements zeroed
pub const DEFAULT_SPARSITY_FRACTION: f32 = 0.1;

/// Prelude for common imports
pub mod prelude {
    pub use super::{SparsityConfig, SparsityTransformer};
}
