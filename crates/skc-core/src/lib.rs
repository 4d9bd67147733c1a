//! # SKC Core
//!
//! Core traits and types for the SKC (sparsify, k-means, compress) tensor
//! pipeline.
//!
//! ## Core Types
//!
//! - [`Tensor`] - Dense row-major `f32` tensor
//! - [`TransformerMetadata`] - Side information one stage emits on `forward`
//! - [`StageData`] - Representation handed between stages
//! - [`Transformer`] - A single reversible stage
//! - [`CompressionStats`] - Size and timing of a forward pass
//!
//! ## Example
//!
//! ```ignore
//! use skc_core::{StageData, Tensor, Transformer};
//! use skc_sparse::SparsityTransformer;
//!
//! let stage = SparsityTransformer::new(0.5)?;
//! let out = stage.forward(StageData::Dense(tensor))?;
//! let restored = stage.backward(out.data, &out.metadata)?;
//! ```

pub mod error;
pub mod metadata;
pub mod stats;
pub mod tensor;
pub mod traits;

pub use error::{Error, Result};
pub use metadata::TransformerMetadata;
pub use stats::CompressionStats;
pub use tensor::Tensor;
pub use traits::{StageData, StageOutput, Transformer};
