//! Single-target losses for speech enhancement.
//!
//! One estimate, one clean target, no speaker permutation:
//!
//! - phase-sensitive approximation: `norm(M ⊙ |Y| − min(|Y|, relu(|S| cos θ)))`
//! - magnitude regression: `mean((Ŝ − |S|)²)`

use burn::{
    config::Config,
    module::Module,
    nn::loss::{MseLoss, Reduction},
    tensor::{backend::Backend, Tensor},
};
use burn_extra_ops::phase_sensitive_target;

use crate::{
    error::ChimeraLossResult,
    inputs::{CleanEstimate, MaskMsaLabel, MaskOutput, MaskPsaLabel},
    norm::{Norm1d, Norm1dConfig},
};

/// Configuration for creating a [mask loss](MaskLoss).
#[derive(Config, Debug)]
pub struct MaskLossConfig {
    /// Norm applied to the phase-sensitive residual.
    #[config(default = "Norm1dConfig::new()")]
    pub norm: Norm1dConfig,
}

impl MaskLossConfig {
    /// Initialize a [mask loss](MaskLoss).
    pub fn init(&self) -> MaskLoss {
        MaskLoss {
            norm: self.norm.init(),
            mse: MseLoss::new(),
        }
    }
}

/// Losses for a single enhanced source.
#[derive(Module, Clone, Debug)]
pub struct MaskLoss {
    /// Residual norm for the phase-sensitive loss.
    pub norm: Norm1d,
    /// Criterion for magnitude regression.
    pub mse: MseLoss,
}

impl Default for MaskLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskLoss {
    /// Create a new mask loss with default configuration.
    pub fn new() -> Self {
        MaskLossConfig::new().init()
    }

    /// Phase-sensitive approximation of the clean magnitude by the masked noisy magnitude.
    ///
    /// # Shapes
    ///
    /// - mask, magnitudes and cosine: `[batch_size, frames, freq]`
    /// - output: `[1]`
    pub fn forward_psa<B: Backend>(&self, output: MaskOutput<B>, label: MaskPsaLabel<B>) -> Tensor<B, 1> {
        assertions(label.check_shapes(output.mask.dims()));

        let target =
            phase_sensitive_target(label.mag_clean, label.cos_diff, label.mag_noisy.clone());
        self.norm.forward(output.mask * label.mag_noisy - target)
    }

    /// Mean squared error between the clean estimate and the clean magnitude.
    ///
    /// Despite the name this does not apply a mask to the noisy magnitude: the network
    /// output is regressed directly, and the values of `cos_diff` are ignored (only its
    /// shape is checked). Callers relying on the masked formulation should use
    /// [`forward_psa`](Self::forward_psa) with unit cosines.
    ///
    /// # Shapes
    ///
    /// - clean_est, mag_clean, cos_diff: `[batch_size, frames, freq]`
    /// - output: `[1]`
    pub fn forward_msa<B: Backend>(&self, output: CleanEstimate<B>, label: MaskMsaLabel<B>) -> Tensor<B, 1> {
        assertions(label.check_shapes(output.clean_est.dims()));

        self.mse
            .forward(output.clean_est, label.mag_clean, Reduction::Mean)
    }
}

fn assertions(result: ChimeraLossResult<()>) {
    if let Err(err) = result {
        panic!("Invalid MaskLoss input: {err}");
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::{Distribution, TensorData, Tolerance};
    use burn_extra_ops::NormOrder;

    use super::*;
    use crate::tests::TestBackend;

    type Device = <TestBackend as Backend>::Device;

    fn psa_label(device: &Device) -> MaskPsaLabel<TestBackend> {
        MaskPsaLabel::new(
            Tensor::from_data(TensorData::from([[[3.0, 1.0], [3.0, 3.0]]]), device),
            Tensor::from_data(TensorData::from([[[2.0, 2.0], [2.0, 2.0]]]), device),
            Tensor::from_data(TensorData::from([[[-0.5, 1.0], [0.5, 1.0]]]), device),
        )
    }

    #[test]
    fn psa_with_zero_mask_measures_clipped_target() {
        let device = Default::default();
        let label = psa_label(&device);
        let mask = label.mag_noisy.zeros_like();

        // target = [0, 1, 1, 2] -> 0 + 1 + 1 + 4
        MaskLoss::new()
            .forward_psa(MaskOutput::new(mask), label)
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([6.0]), Tolerance::default());
    }

    #[test]
    fn psa_with_unit_mask_measures_excess_over_target() {
        let device = Default::default();
        let label = psa_label(&device);
        let mask = label.mag_noisy.ones_like();

        // noisy - target = [3, 0, 2, 1] -> 9 + 0 + 4 + 1
        MaskLoss::new()
            .forward_psa(MaskOutput::new(mask), label)
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([14.0]), Tolerance::default());
    }

    #[test]
    fn psa_uses_configured_norm() {
        let device = Default::default();
        let label = psa_label(&device);
        let mask = label.mag_noisy.ones_like();
        let loss = MaskLossConfig::new()
            .with_norm(Norm1dConfig::new().with_order(NormOrder::L1))
            .init();

        loss.forward_psa(MaskOutput::new(mask), label)
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([6.0]), Tolerance::default());
    }

    #[test]
    fn msa_is_mean_squared_error_of_estimate() {
        let device = Default::default();
        let estimate = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[1.0, 2.0], [3.0, 4.0]]]),
            &device,
        );
        let clean = Tensor::from_data(TensorData::from([[[1.0, 0.0], [3.0, 2.0]]]), &device);
        let cos = Tensor::zeros([1, 2, 2], &device);

        // (0 + 4 + 0 + 4) / 4
        MaskLoss::new()
            .forward_msa(CleanEstimate::new(estimate), MaskMsaLabel::new(clean, cos))
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([2.0]), Tolerance::default());
    }

    #[test]
    fn msa_ignores_phase_cosine() {
        let device = Default::default();
        let loss = MaskLoss::new();
        let estimate =
            Tensor::<TestBackend, 3>::random([2, 3, 4], Distribution::Uniform(0.0, 1.0), &device);
        let clean = Tensor::random([2, 3, 4], Distribution::Uniform(0.0, 1.0), &device);

        let with_zero = loss.forward_msa(
            CleanEstimate::new(estimate.clone()),
            MaskMsaLabel::new(clean.clone(), clean.zeros_like()),
        );
        let with_random = loss.forward_msa(
            CleanEstimate::new(estimate),
            MaskMsaLabel::new(
                clean.clone(),
                Tensor::random([2, 3, 4], Distribution::Uniform(-1.0, 1.0), &device),
            ),
        );

        assert_eq!(with_zero.into_scalar(), with_random.into_scalar());
    }

    #[test]
    #[should_panic = "Invalid MaskLoss input: shape of cos_diff"]
    fn psa_mismatched_shapes_panic() {
        let device = Default::default();
        let label = psa_label(&device);
        let label = MaskPsaLabel::new(
            label.mag_noisy,
            label.mag_clean,
            Tensor::zeros([1, 2, 1], &device),
        );

        let _ = MaskLoss::new().forward_psa(MaskOutput::new(Tensor::zeros([1, 2, 2], &device)), label);
    }

    #[test]
    #[should_panic = "Invalid MaskLoss input: shape of mag_clean"]
    fn msa_mismatched_shapes_panic() {
        let device = Default::default();
        let estimate = Tensor::<TestBackend, 3>::zeros([1, 2, 2], &device);
        let clean = Tensor::zeros([1, 2, 3], &device);

        let _ = MaskLoss::new().forward_msa(
            CleanEstimate::new(estimate),
            MaskMsaLabel::new(clean.clone(), clean),
        );
    }
}
