//! Wire envelope for one compressed tensor.

use serde::{Deserialize, Serialize};
use skc_core::{Error, Result, TransformerMetadata};

/// A compressed tensor as exchanged between collaborator and aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTensor {
    /// Tensor name
    pub name: String,
    /// Training round the tensor belongs to
    pub round_number: u64,
    /// Whether decompression reproduces the tensor exactly
    pub lossless: bool,
    /// Whether this tensor is a reported metric rather than a weight
    pub report: bool,
    /// Pipeline payload
    pub data_bytes: Vec<u8>,
    /// One record per stage, in application order
    pub transformer_metadata: Vec<TransformerMetadata>,
}

impl NamedTensor {
    /// Serialize with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from bincode.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Payload size in bytes.
    pub fn payload_len(&self) -> usize {
        self.data_bytes.len()
    }
}
