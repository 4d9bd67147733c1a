//! Lossless code compression
//!
//! Serializes integer codes to a canonical varint layout and shrinks the
//! bytes with Zstandard. Compression is only kept when it actually saves
//! space; a one-element `bool_sequence` records which form was emitted.
//!
//! ## Layout
//!
//! ```text
//! codes ──LEB128──▶ raw bytes ──zstd (if smaller)──▶ payload     bool_sequence = [applied]
//! ```

mod compress;
mod varint;

pub use compress::{LosslessCompressTransformer, LosslessConfig, STAGE_NAME};
pub use varint::{decode_codes, encode_codes, encoded_len};

/// Default Zstandard level
pub const DEFAULT_LEVEL: i32 = 3;

/// Prelude for common imports
pub mod prelude {
    pub use super::{LosslessCompressTransformer, LosslessConfig};
}
