//! Residual norm shared by the mask losses.
//!
//! Reduces a spectrogram-shaped residual to a scalar: each sample is reduced with the
//! configured [order](NormOrder) and the results are averaged over the batch.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{backend::Backend, Tensor},
};
use burn_extra_ops::{norm_per_sample, NormOrder};

/// Configuration for creating a [residual norm](Norm1d).
#[derive(Config, Debug)]
pub struct Norm1dConfig {
    /// Norm applied to each sample. Default: squared L2
    #[config(default = "NormOrder::L2Squared")]
    pub order: NormOrder,
}

impl Norm1dConfig {
    /// Initialize a [residual norm](Norm1d).
    pub fn init(&self) -> Norm1d {
        Norm1d {
            exponent: self.order.exponent(),
            rooted: self.order.is_rooted(),
        }
    }
}

/// Per-batch averaged norm of a residual tensor.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct Norm1d {
    /// Exponent applied to every absolute residual.
    pub exponent: f64,
    /// Whether the per-sample sum is taken back to the first power.
    pub rooted: bool,
}

impl Default for Norm1d {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for Norm1d {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content.add("exponent", &self.exponent).optional()
    }
}

impl Norm1d {
    /// Create a squared L2 norm.
    pub fn new() -> Self {
        Norm1dConfig::new().init()
    }

    /// Reduce the residual to a scalar.
    ///
    /// # Shapes
    ///
    /// - residual: `[batch_size, ...]`
    /// - output: `[1]`
    pub fn forward<const D: usize, B: Backend>(&self, residual: Tensor<B, D>) -> Tensor<B, 1> {
        self.forward_no_reduction(residual).mean()
    }

    /// Reduce each sample of the residual without averaging over the batch.
    ///
    /// # Shapes
    ///
    /// - residual: `[batch_size, ...]`
    /// - output: `[batch_size]`
    pub fn forward_no_reduction<const D: usize, B: Backend>(
        &self,
        residual: Tensor<B, D>,
    ) -> Tensor<B, 1> {
        norm_per_sample(residual, self.exponent, self.rooted)
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::{TensorData, Tolerance};

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn norm_default_is_squared_l2() {
        let device = Default::default();
        let norm = Norm1d::new();

        let residual = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[1.0, -2.0], [0.0, 2.0]], [[0.0, 0.0], [0.0, 1.0]]]),
            &device,
        );

        // per sample: 1 + 4 + 0 + 4 = 9 and 1 -> mean 5
        norm.forward(residual)
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([5.0]), Tolerance::default());
    }

    #[test]
    fn norm_l1_without_reduction_keeps_samples() {
        let device = Default::default();
        let norm = Norm1dConfig::new().with_order(NormOrder::L1).init();

        let residual = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[1.0, -2.0], [0.0, 2.0]], [[0.0, 0.0], [0.0, 1.0]]]),
            &device,
        );

        norm.forward_no_reduction(residual)
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([5.0, 1.0]), Tolerance::default());
    }

    #[test]
    fn norm_config_round_trips_through_json() {
        let config = Norm1dConfig::new().with_order(NormOrder::L2);
        let json = config.to_string();
        let restored: Norm1dConfig = Config::load_binary(json.as_bytes()).expect("valid config");

        assert_eq!(restored.order, NormOrder::L2);
        assert!(restored.init().rooted);
    }

    #[test]
    fn norm_display_shows_exponent() {
        let norm = Norm1dConfig::new().with_order(NormOrder::L1).init();

        assert_eq!(format!("{norm}"), "Norm1d {exponent: 1}");
    }
}
