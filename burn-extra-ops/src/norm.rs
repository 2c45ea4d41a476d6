//! # Per-batch norms
//!
//! Reduces a residual tensor to a scalar: every sample of the batch is flattened,
//! reduced with the selected norm, and the per-sample values are averaged.
//!
//! ```text
//! norm_1d(x) = mean_b( (Σ_i |x[b, i]|^p)^(1/p) )   when rooted
//! norm_1d(x) = mean_b(  Σ_i |x[b, i]|^p )          otherwise
//! ```

use burn::prelude::*;

/// Norm applied to each sample before averaging over the batch.
#[derive(Config, Debug, PartialEq, Eq)]
pub enum NormOrder {
    /// Sum of absolute values.
    L1,
    /// Euclidean norm.
    L2,
    /// Sum of squares.
    L2Squared,
}

impl NormOrder {
    /// Exponent applied to the absolute value of every element.
    #[must_use]
    pub const fn exponent(&self) -> f64 {
        match self {
            Self::L1 => 1.0,
            Self::L2 | Self::L2Squared => 2.0,
        }
    }

    /// Whether the per-sample sum is taken to the power `1 / exponent`.
    #[must_use]
    pub const fn is_rooted(&self) -> bool {
        matches!(self, Self::L2)
    }
}

/// Reduces `x` to a scalar with the given norm, averaged over the batch.
///
/// # Shapes
/// - x: `[batch_size, ...]`
/// - output: `[1]`
pub fn norm_1d<B: Backend, const D: usize>(x: Tensor<B, D>, order: &NormOrder) -> Tensor<B, 1> {
    norm_per_sample(x, order.exponent(), order.is_rooted()).mean()
}

/// Per-sample norm with an explicit exponent.
///
/// # Shapes
/// - x: `[batch_size, ...]`
/// - output: `[batch_size]`
pub fn norm_per_sample<B: Backend, const D: usize>(
    x: Tensor<B, D>,
    exponent: f64,
    rooted: bool,
) -> Tensor<B, 1> {
    assert!(
        exponent > 0.0,
        "Norm exponent must be positive, got {exponent}"
    );
    let batch_size = x.dims()[0];
    let flat: Tensor<B, 2> = x.reshape([batch_size as i32, -1]);

    let magnitude = flat.abs();
    let powered = if exponent == 1.0 {
        magnitude
    } else {
        magnitude.powf_scalar(exponent)
    };
    let summed: Tensor<B, 1> = powered.sum_dim(1).reshape([batch_size]);

    if rooted {
        summed.powf_scalar(1.0 / exponent)
    } else {
        summed
    }
}
