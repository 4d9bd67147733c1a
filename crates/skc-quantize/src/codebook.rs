//! Scalar codebook with a reserved zero code

use skc_core::{Error, Result};
use std::collections::BTreeMap;

/// Code reserved for exact zeros
pub const ZERO_CODE: u32 = 0;

/// Ascending centroids addressed by codes `1..=len`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Codebook {
    centroids: Vec<f32>,
}

impl Codebook {
    /// Codebook holding only the reserved zero entry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create from existing centroids (sorted on construction)
    pub fn from_centroids(mut centroids: Vec<f32>) -> Result<Self> {
        if let Some(bad) = centroids.iter().find(|c| !c.is_finite()) {
            return Err(Error::InvalidInput(format!("non-finite centroid {bad}")));
        }
        if centroids.len() >= u32::MAX as usize {
            return Err(Error::InvalidInput(format!(
                "{} centroids do not fit in u32 codes",
                centroids.len()
            )));
        }
        centroids.sort_by(f32::total_cmp);
        Ok(Self { centroids })
    }

    /// Rebuild from a transmitted code table.
    ///
    /// Keys must be `0..n` without gaps and code 0 must decode to zero.
    pub fn from_table(table: &BTreeMap<u32, f32>) -> Result<Self> {
        match table.get(&ZERO_CODE) {
            Some(&z) if z == 0.0 => {}
            Some(&z) => {
                return Err(Error::corrupted(format!(
                    "reserved code {ZERO_CODE} maps to {z}, expected 0"
                )))
            }
            None => return Err(Error::corrupted("code table lacks the reserved zero code")),
        }

        let mut centroids = Vec::with_capacity(table.len().saturating_sub(1));
        for (expected, (&code, &value)) in (1u32..).zip(table.iter().skip(1)) {
            if code != expected {
                return Err(Error::corrupted(format!(
                    "code table has gap: expected code {expected}, found {code}"
                )));
            }
            centroids.push(value);
        }

        Ok(Self { centroids })
    }

    /// Number of centroids, not counting the zero code.
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    /// Check whether only the zero code exists.
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Centroids in code order.
    pub fn centroids(&self) -> &[f32] {
        &self.centroids
    }

    /// Code for `value`: zero for exact zeros, otherwise `1 + nearest centroid`.
    ///
    /// Equidistant values resolve to the lower centroid.
    pub fn encode(&self, value: f32) -> u32 {
        if value == 0.0 || self.centroids.is_empty() {
            return ZERO_CODE;
        }
        (self.nearest(value) + 1) as u32
    }

    /// Value for `code`, if the code exists.
    pub fn decode(&self, code: u32) -> Option<f32> {
        if code == ZERO_CODE {
            return Some(0.0);
        }
        self.centroids.get(code as usize - 1).copied()
    }

    /// Index of the centroid closest to `value`.
    pub fn nearest(&self, value: f32) -> usize {
        nearest_sorted(&self.centroids, value)
    }

    /// Code to value table including the reserved zero entry.
    pub fn to_table(&self) -> BTreeMap<u32, f32> {
        std::iter::once((ZERO_CODE, 0.0))
            .chain(
                self.centroids
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| (i as u32 + 1, c)),
            )
            .collect()
    }
}

/// Index of the element of ascending `sorted` closest to `value`.
pub(crate) fn nearest_sorted(sorted: &[f32], value: f32) -> usize {
    debug_assert!(!sorted.is_empty());
    let upper = sorted.partition_point(|&c| c < value);
    if upper == 0 {
        return 0;
    }
    if upper == sorted.len() {
        return sorted.len() - 1;
    }
    let below = value - sorted[upper - 1];
    let above = sorted[upper] - value;
    if above < below {
        upper
    } else {
        upper - 1
    }
}
