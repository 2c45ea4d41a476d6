//! # Phase-sensitive targets
//!
//! A clean magnitude projected on the mixture phase, `|S| cos(θ_y - θ_s)`, can be
//! negative or exceed the mixture magnitude. The phase-sensitive target truncates it
//! to `[0, |Y|]`:
//!
//! ```text
//! target = min(|Y|, relu(|S| * cos))
//! ```

use burn::{prelude::*, tensor::activation};

/// Element-wise minimum of two tensors of the same shape.
///
/// Where both values are equal the element of `lhs` is kept, so gradients flow
/// to `lhs` on ties.
pub fn minimum<B: Backend, const D: usize>(lhs: Tensor<B, D>, rhs: Tensor<B, D>) -> Tensor<B, D> {
    let take_rhs = rhs.clone().lower(lhs.clone());
    lhs.mask_where(take_rhs, rhs)
}

/// Computes `min(mag_mix, relu(mag_clean * cos))`.
///
/// # Shapes
/// - mag_clean, cos, mag_mix: `[batch_size, frames, freq]` (any shape, all equal)
/// - output: same as inputs
pub fn phase_sensitive_target<B: Backend, const D: usize>(
    mag_clean: Tensor<B, D>,
    cos: Tensor<B, D>,
    mag_mix: Tensor<B, D>,
) -> Tensor<B, D> {
    let projected = activation::relu(mag_clean * cos);
    minimum(mag_mix, projected)
}
