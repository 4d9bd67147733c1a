//! Model-update deltas.
//!
//! Collaborators usually send `current - base` rather than raw weights;
//! deltas are small and cluster well.

use skc_core::{Error, Result, Tensor};

fn zip_with(a: &Tensor, b: &Tensor, op: impl Fn(f32, f32) -> f32) -> Result<Tensor> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            expected: a.shape().to_vec(),
            actual: b.shape().to_vec(),
        });
    }
    let data = a.data().iter().zip(b.data()).map(|(&x, &y)| op(x, y)).collect();
    Tensor::new(a.shape().to_vec(), data)
}

/// Element-wise `current - base`.
pub fn generate_delta(current: &Tensor, base: &Tensor) -> Result<Tensor> {
    zip_with(current, base, |c, b| c - b)
}

/// Element-wise `base + delta`.
pub fn apply_delta(base: &Tensor, delta: &Tensor) -> Result<Tensor> {
    zip_with(base, delta, |b, d| b + d)
}
