//! 1-D k-means over weighted distinct values

use crate::codebook::nearest_sorted;
use crate::DEFAULT_SEED;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use skc_core::{Error, Result};

/// Configuration for codebook training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Maximum Lloyd iterations; always at least one
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Stop once no centroid moves further than this
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
    /// Seed for k-means++ initialization
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            seed: default_seed(),
        }
    }
}

fn default_max_iterations() -> usize {
    100
}

fn default_tolerance() -> f32 {
    1e-6
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl TrainingConfig {
    /// Check iteration cap and tolerance.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::config("max_iterations must be at least 1"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::config(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Output of one training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedClusters {
    /// Ascending centroids
    pub centroids: Vec<f32>,
    /// Lloyd iterations performed
    pub iterations: usize,
    /// Whether the tolerance was reached before the cap
    pub converged: bool,
    /// Weighted sum of squared distances to the assigned centroid
    pub inertia: f64,
}

/// Codebook trainer using K-means clustering
#[derive(Debug, Clone, Default)]
pub struct ClusterTrainer {
    config: TrainingConfig,
}

impl ClusterTrainer {
    /// Create a new trainer
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Configuration
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Cluster `values` (ascending, distinct, finite) weighted by `weights`
    /// into at most `k` centroids.
    ///
    /// With `k >= values.len()` every value becomes its own centroid.
    pub fn fit(&self, values: &[f32], weights: &[u64], k: usize) -> Result<TrainedClusters> {
        if k == 0 {
            return Err(Error::config("cluster count must be at least 1"));
        }
        if values.len() != weights.len() {
            return Err(Error::contract(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        if values.is_empty() {
            return Ok(TrainedClusters {
                centroids: Vec::new(),
                iterations: 0,
                converged: true,
                inertia: 0.0,
            });
        }
        if values.len() <= k {
            return Ok(TrainedClusters {
                centroids: values.to_vec(),
                iterations: 0,
                converged: true,
                inertia: 0.0,
            });
        }

        let mut centroids = self.kmeans_pp_init(values, weights, k);
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.config.max_iterations {
            iterations = iter + 1;

            let assignments = assign_clusters(&centroids, values);
            let updated = update_centroids(&assignments, values, weights, &centroids);

            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f32, f32::max);
            centroids = updated;

            if shift <= self.config.tolerance {
                converged = true;
                break;
            }
        }

        let assignments = assign_clusters(&centroids, values);
        let inertia = compute_inertia(&centroids, &assignments, values, weights);

        Ok(TrainedClusters {
            centroids,
            iterations,
            converged,
            inertia,
        })
    }

    /// K-means++ initialization, sampling proportional to weight times
    /// squared distance. Returns ascending centroids.
    fn kmeans_pp_init(&self, values: &[f32], weights: &[u64], k: usize) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut centroids = Vec::with_capacity(k);
        let mut chosen = vec![false; values.len()];
        let mut distances = vec![f64::INFINITY; values.len()];

        let total_weight: f64 = weights.iter().map(|&w| w as f64).sum();
        let first = sample_index(&mut rng, weights.iter().map(|&w| w as f64), total_weight);
        centroids.push(values[first]);
        chosen[first] = true;

        while centroids.len() < k {
            let last = *centroids.last().unwrap_or(&values[first]) as f64;
            for (d, &v) in distances.iter_mut().zip(values) {
                let dist = (v as f64 - last).powi(2);
                *d = d.min(dist);
            }

            let scores: Vec<f64> = distances
                .iter()
                .zip(weights)
                .zip(&chosen)
                .map(|((&d, &w), &taken)| if taken { 0.0 } else { d * w as f64 })
                .collect();
            let total: f64 = scores.iter().sum();

            let next = if total > 0.0 {
                sample_index(&mut rng, scores.iter().copied(), total)
            } else {
                // Every remaining value coincides with a centroid.
                match chosen.iter().position(|&taken| !taken) {
                    Some(i) => i,
                    None => break,
                }
            };
            centroids.push(values[next]);
            chosen[next] = true;
        }

        centroids.sort_by(f32::total_cmp);
        centroids
    }
}

/// Pick an index with probability proportional to its score.
fn sample_index(rng: &mut StdRng, scores: impl Iterator<Item = f64>, total: f64) -> usize {
    let threshold = rng.gen::<f64>() * total;
    let mut cumsum = 0.0;
    let mut last_positive = 0;
    for (i, s) in scores.enumerate() {
        if s <= 0.0 {
            continue;
        }
        cumsum += s;
        last_positive = i;
        if cumsum > threshold {
            return i;
        }
    }
    last_positive
}

/// Assign each value to its nearest centroid
fn assign_clusters(centroids: &[f32], values: &[f32]) -> Vec<usize> {
    values
        .iter()
        .map(|&v| nearest_sorted(centroids, v))
        .collect()
}

/// Weighted means of each cluster.
///
/// An empty cluster is re-seeded with the value farthest from every other
/// centroid, so the codebook never holds a duplicate that can attract
/// nothing.
fn update_centroids(
    assignments: &[usize],
    values: &[f32],
    weights: &[u64],
    previous: &[f32],
) -> Vec<f32> {
    let mut sums = vec![0.0f64; previous.len()];
    let mut counts = vec![0u64; previous.len()];

    for ((&cluster, &v), &w) in assignments.iter().zip(values).zip(weights) {
        sums[cluster] += v as f64 * w as f64;
        counts[cluster] += w;
    }

    let mut centroids: Vec<f32> = previous
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(&old, (&sum, &count))| {
            if count > 0 {
                (sum / count as f64) as f32
            } else {
                old
            }
        })
        .collect();

    for empty in (0..centroids.len()).filter(|&j| counts[j] == 0) {
        if let Some(value) = farthest_value(&centroids, empty, values) {
            centroids[empty] = value;
        }
    }

    centroids.sort_by(f32::total_cmp);
    centroids
}

/// Value with the largest distance to its nearest centroid, ignoring
/// `skip`. Ties go to the lowest index; `None` if every value is a centroid.
fn farthest_value(centroids: &[f32], skip: usize, values: &[f32]) -> Option<f32> {
    let mut best: Option<(f32, f32)> = None;
    for &v in values {
        let dist = centroids
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != skip)
            .map(|(_, &c)| (v - c).abs())
            .fold(f32::INFINITY, f32::min);
        if dist > 0.0 && best.map_or(true, |(d, _)| dist > d) {
            best = Some((dist, v));
        }
    }
    best.map(|(_, v)| v)
}

/// Weighted sum of squared distances
fn compute_inertia(centroids: &[f32], assignments: &[usize], values: &[f32], weights: &[u64]) -> f64 {
    assignments
        .iter()
        .zip(values)
        .zip(weights)
        .map(|((&cluster, &v), &w)| (v as f64 - centroids[cluster] as f64).powi(2) * w as f64)
        .sum()
}
