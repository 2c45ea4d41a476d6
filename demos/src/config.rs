//! Configuration for the `evaluate` binary.
//!
//! Loaded from JSON via [`EvaluationConfig::load`]; command-line flags override the
//! loaded values.

use burn::config::Config;
use chimera_loss::{ChimeraLossConfig, LossKind, MaskLossConfig};

/// Shape and randomness of the synthetic mixture.
#[derive(Config, Debug)]
pub struct MixtureConfig {
    #[config(default = 2)]
    pub batch_size: usize,

    /// Number of STFT frames.
    #[config(default = 100)]
    pub frames: usize,

    /// Number of frequency bins.
    #[config(default = 129)]
    pub bins: usize,

    /// Embedding dimension of the deep clustering head.
    #[config(default = 20)]
    pub embedding_dim: usize,

    #[config(default = 42)]
    pub seed: u64,
}

/// Everything needed to evaluate one loss formulation.
#[derive(Config, Debug)]
pub struct EvaluationConfig {
    /// Formulation to evaluate.
    #[config(default = "LossKind::Msa")]
    pub loss: LossKind,

    /// Settings for `loss_msa` and `loss_chimera_psa`.
    #[config(default = "ChimeraLossConfig::new()")]
    pub chimera: ChimeraLossConfig,

    /// Settings for `loss_mask_psa` and `loss_mask_msa`.
    #[config(default = "MaskLossConfig::new()")]
    pub mask: MaskLossConfig,

    #[config(default = "MixtureConfig::new()")]
    pub mixture: MixtureConfig,
}

impl EvaluationConfig {
    /// Checks the mixture shape and the loss weights before any tensor is allocated.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty dimension or invalid weight.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mixture = &self.mixture;
        anyhow::ensure!(mixture.batch_size > 0, "Batch size must be greater than 0");
        anyhow::ensure!(mixture.frames > 0, "Number of frames must be greater than 0");
        anyhow::ensure!(mixture.bins > 0, "Number of bins must be greater than 0");
        anyhow::ensure!(
            mixture.embedding_dim > 0,
            "Embedding dimension must be greater than 0"
        );

        let chimera = &self.chimera;
        anyhow::ensure!(
            chimera.embedding_weight >= 0.0,
            "Embedding weight must be non-negative, got {}",
            chimera.embedding_weight
        );
        anyhow::ensure!(
            chimera.mask_weight >= 0.0,
            "Mask weight must be non-negative, got {}",
            chimera.mask_weight
        );
        anyhow::ensure!(
            chimera.embedding_weight + chimera.mask_weight > 0.0,
            "At least one of embedding and mask weight must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_small_two_speaker_batch() {
        let config = EvaluationConfig::new();

        assert_eq!(config.loss, LossKind::Msa);
        assert_eq!(config.mixture.batch_size, 2);
        assert_eq!(config.chimera.embedding_weight, 0.975);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_dimension_is_rejected() {
        let config =
            EvaluationConfig::new().with_mixture(MixtureConfig::new().with_frames(0));

        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Number of frames must be greater than 0");
    }

    #[test]
    fn invalid_chimera_weights_are_rejected_before_init() {
        let negative = EvaluationConfig::new()
            .with_chimera(ChimeraLossConfig::new().with_mask_weight(-1.0));
        let zero = EvaluationConfig::new().with_chimera(
            ChimeraLossConfig::new()
                .with_embedding_weight(0.0)
                .with_mask_weight(0.0),
        );

        assert_eq!(
            negative.validate().unwrap_err().to_string(),
            "Mask weight must be non-negative, got -1"
        );
        assert_eq!(
            zero.validate().unwrap_err().to_string(),
            "At least one of embedding and mask weight must be positive"
        );
    }

    #[test]
    fn invalid_weights_from_json_are_rejected() {
        let json = EvaluationConfig::new()
            .with_chimera(ChimeraLossConfig::new().with_embedding_weight(-0.5))
            .to_string();

        let loaded = EvaluationConfig::load_binary(json.as_bytes()).expect("config should deserialize");

        assert!(loaded.validate().is_err());
    }

    #[test]
    fn json_round_trip_keeps_nested_settings() {
        let config = EvaluationConfig::new()
            .with_loss(LossKind::MaskPsa)
            .with_chimera(ChimeraLossConfig::new().with_mask_weight(0.5));

        let loaded = EvaluationConfig::load_binary(config.to_string().as_bytes())
            .expect("config should deserialize");

        assert_eq!(loaded.loss, LossKind::MaskPsa);
        assert_eq!(loaded.chimera.mask_weight, 0.5);
    }
}
