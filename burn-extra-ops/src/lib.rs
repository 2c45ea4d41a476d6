//! Additional operations for the Burn deep learning framework
//!
//! Reductions and element-wise operations used by spectral-masking losses that are not
//! available in the core Burn framework: per-batch norms, an element-wise minimum that
//! keeps gradients, and phase-sensitive target truncation.

use burn::prelude::*;

mod norm;
mod phase;

// Convenient re-exports
pub use norm::{norm_1d, norm_per_sample, NormOrder};
pub use phase::{minimum, phase_sensitive_target};

/// Additional operations for Burn tensors
pub trait TensorExtraOps<B: Backend, const D: usize> {
    /// Reduce to a scalar with the given norm, averaged over the batch dimension
    fn norm_1d(self, order: &NormOrder) -> Tensor<B, 1>;

    /// Element-wise minimum with another tensor of the same shape
    fn minimum(self, other: Self) -> Self;

    /// Treat `self` as a clean magnitude and truncate `self * cos` to `[0, mag_mix]`
    fn phase_sensitive(self, cos: Self, mag_mix: Self) -> Self;
}

impl<B: Backend, const D: usize> TensorExtraOps<B, D> for Tensor<B, D> {
    fn norm_1d(self, order: &NormOrder) -> Tensor<B, 1> {
        norm_1d(self, order)
    }

    fn minimum(self, other: Self) -> Self {
        minimum(self, other)
    }

    fn phase_sensitive(self, cos: Self, mag_mix: Self) -> Self {
        phase_sensitive_target(self, cos, mag_mix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{ndarray::NdArray, Autodiff},
        tensor::{Distribution, Tensor},
    };

    type TestBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_tensor_extra_ops() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 3>::random(
            [2, 4, 5],
            Distribution::Uniform(0.0, 1.0),
            &device,
        );

        let clipped = tensor
            .clone()
            .phase_sensitive(tensor.ones_like(), tensor.clone());
        assert_eq!(clipped.dims(), tensor.dims());

        // A tensor truncated to itself leaves nothing behind
        let residual = (clipped - tensor).norm_1d(&NormOrder::L1);
        assert_eq!(residual.dims(), [1]);
        assert!(residual.into_scalar() < 1e-6);
    }
}
