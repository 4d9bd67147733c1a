//! Batch compression on the rayon thread pool.
//!
//! Each tensor is an independent task. One failing tensor does not affect
//! the others; results come back in input order.

use crate::codec::TensorCodec;
use crate::envelope::NamedTensor;
use rayon::prelude::*;
use skc_core::{CompressionStats, Result, Tensor};
use tracing::info;

/// Outcome of [`compress_batch`].
#[derive(Debug)]
pub struct BatchReport {
    /// Per-tensor results in input order.
    pub results: Vec<Result<NamedTensor>>,
    /// Stats merged over the tensors that succeeded.
    pub stats: CompressionStats,
}

impl BatchReport {
    /// Number of tensors that failed.
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }
}

/// Compress named tensors for one round in parallel.
pub fn compress_batch(
    codec: &TensorCodec,
    round_number: u64,
    tensors: &[(String, Tensor)],
    report: bool,
) -> BatchReport {
    let outcomes: Vec<Result<(NamedTensor, CompressionStats)>> = tensors
        .par_iter()
        .map(|(name, tensor)| codec.compress_with_stats(name, round_number, tensor, report))
        .collect();

    let mut stats = CompressionStats::new();
    let results = outcomes
        .into_iter()
        .map(|outcome| {
            outcome.map(|(envelope, s)| {
                stats.merge(&s);
                envelope
            })
        })
        .collect::<Vec<_>>();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(round = round_number, failed, "batch: {}", stats.summary());

    BatchReport { results, stats }
}

/// Decompress envelopes in parallel, preserving order.
pub fn decompress_batch(codec: &TensorCodec, envelopes: &[NamedTensor]) -> Vec<Result<Tensor>> {
    envelopes
        .par_iter()
        .map(|envelope| codec.decompress(envelope))
        .collect()
}
