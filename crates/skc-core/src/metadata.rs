//! Per-stage side information.
//!
//! Every transformer emits exactly one [`TransformerMetadata`] per `forward`
//! call and needs that same record back on `backward`. Records carry no
//! stage tag: a record belongs to a stage purely by its position in the
//! pipeline's metadata list.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Side information one stage needs to invert itself.
///
/// All three fields are independently optional; an empty field means
/// "not written by this stage".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformerMetadata {
    /// Small integer key to float value (e.g. code to centroid).
    pub scalar_map: BTreeMap<u32, f32>,
    /// Ordered integers (e.g. an original tensor shape).
    pub int_sequence: Vec<i64>,
    /// Ordered flags (e.g. whether compression was applied).
    pub bool_sequence: Vec<bool>,
}

impl TransformerMetadata {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tensor shape in `int_sequence`.
    pub fn with_shape(mut self, shape: &[usize]) -> Self {
        self.int_sequence = shape.iter().map(|&d| d as i64).collect();
        self
    }

    /// Set the lookup table.
    pub fn with_scalar_map(mut self, map: BTreeMap<u32, f32>) -> Self {
        self.scalar_map = map;
        self
    }

    /// Append a flag to `bool_sequence`.
    pub fn with_flag(mut self, flag: bool) -> Self {
        self.bool_sequence.push(flag);
        self
    }

    /// Check whether no field was written.
    pub fn is_empty(&self) -> bool {
        self.scalar_map.is_empty() && self.int_sequence.is_empty() && self.bool_sequence.is_empty()
    }

    /// Read `int_sequence` back as a tensor shape.
    pub fn shape(&self, stage: &'static str) -> Result<Vec<usize>> {
        if self.int_sequence.is_empty() {
            return Err(Error::missing(stage, "int_sequence"));
        }
        self.int_sequence
            .iter()
            .map(|&d| {
                usize::try_from(d)
                    .map_err(|_| Error::contract(format!("{stage}: negative dimension {d} in shape")))
            })
            .collect()
    }

    /// First entry of `bool_sequence`.
    pub fn flag(&self, stage: &'static str) -> Result<bool> {
        self.bool_sequence
            .first()
            .copied()
            .ok_or_else(|| Error::missing(stage, "bool_sequence"))
    }

    /// Non-empty `scalar_map`.
    pub fn table(&self, stage: &'static str) -> Result<&BTreeMap<u32, f32>> {
        if self.scalar_map.is_empty() {
            return Err(Error::missing(stage, "scalar_map"));
        }
        Ok(&self.scalar_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_roundtrip() {
        let meta = TransformerMetadata::new().with_shape(&[1, 32]);
        assert_eq!(meta.int_sequence, vec![1, 32]);
        assert_eq!(meta.shape("test").unwrap(), vec![1, 32]);
    }

    #[test]
    fn test_missing_fields() {
        let meta = TransformerMetadata::new();
        assert!(meta.is_empty());
        assert!(matches!(
            meta.shape("sparsity"),
            Err(Error::MissingMetadata { field: "int_sequence", .. })
        ));
        assert!(matches!(
            meta.flag("lossless_compress"),
            Err(Error::MissingMetadata { field: "bool_sequence", .. })
        ));
        assert!(matches!(
            meta.table("cluster_quantize"),
            Err(Error::MissingMetadata { field: "scalar_map", .. })
        ));
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let meta = TransformerMetadata {
            int_sequence: vec![4, -1],
            ..Default::default()
        };
        assert!(meta.shape("sparsity").unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert(0, 0.0);
        map.insert(1, 0.25);
        let meta = TransformerMetadata::new()
            .with_scalar_map(map)
            .with_shape(&[3, 3])
            .with_flag(true);

        let bytes = bincode::serialize(&meta).unwrap();
        let back: TransformerMetadata = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, meta);
    }
}
