//! Synthetic two-speaker mixtures.

use burn::tensor::{activation::sigmoid, backend::Backend, Distribution, Tensor};
use chimera_loss::{
    dominant_speaker_one_hot, ChimeraOutput, CleanEstimate, MaskMsaLabel, MaskOutput,
    MaskPsaLabel, MsaLabel, PsaLabel,
};

use crate::config::MixtureConfig;

/// Random speaker magnitudes with the network outputs a Chimera model could emit
/// for their sum.
#[derive(Debug, Clone)]
pub struct SyntheticMixture<B: Backend> {
    pub mag_s1: Tensor<B, 3>,
    pub mag_s2: Tensor<B, 3>,
    /// `|S1| + |S2|`.
    pub mag_mix: Tensor<B, 3>,
    pub cos_s1: Tensor<B, 3>,
    pub cos_s2: Tensor<B, 3>,
    pub embedding: Tensor<B, 4>,
    pub mask_a: Tensor<B, 3>,
    pub mask_b: Tensor<B, 3>,
}

impl<B: Backend> SyntheticMixture<B> {
    /// Draws a mixture; the backend must already be seeded for reproducible output.
    pub fn generate(config: &MixtureConfig, device: &B::Device) -> Self {
        let shape = [config.batch_size, config.frames, config.bins];
        let magnitude = || Tensor::<B, 3>::random(shape, Distribution::Uniform(0.0, 1.0), device);
        let cosine = || Tensor::<B, 3>::random(shape, Distribution::Uniform(-1.0, 1.0), device);
        let logits = || Tensor::<B, 3>::random(shape, Distribution::Normal(0.0, 1.0), device);

        let mag_s1 = magnitude();
        let mag_s2 = magnitude();
        let mag_mix = mag_s1.clone() + mag_s2.clone();

        Self {
            mag_s1,
            mag_s2,
            mag_mix,
            cos_s1: cosine(),
            cos_s2: cosine(),
            embedding: Tensor::random(
                [config.batch_size, config.frames, config.bins, config.embedding_dim],
                Distribution::Normal(0.0, 1.0),
                device,
            ),
            mask_a: sigmoid(logits()),
            mask_b: sigmoid(logits()),
        }
    }

    /// Ideal binary assignment of each bin to the louder speaker.
    pub fn one_hot(&self) -> Tensor<B, 4> {
        dominant_speaker_one_hot(&[self.mag_s1.clone(), self.mag_s2.clone()])
    }

    pub fn chimera_output(&self) -> ChimeraOutput<B> {
        ChimeraOutput::new(
            self.embedding.clone(),
            self.mask_a.clone(),
            self.mask_b.clone(),
        )
    }

    pub fn msa_label(&self) -> MsaLabel<B> {
        MsaLabel::new(
            self.one_hot(),
            self.mag_mix.clone(),
            self.mag_s1.clone(),
            self.mag_s2.clone(),
        )
    }

    pub fn psa_label(&self) -> PsaLabel<B> {
        PsaLabel::new(
            self.one_hot(),
            self.mag_mix.clone(),
            self.mag_s1.clone(),
            self.mag_s2.clone(),
            self.cos_s1.clone(),
            self.cos_s2.clone(),
        )
    }

    /// Enhancement view: mask A recovers speaker 1, speaker 2 is the noise.
    pub fn mask_output(&self) -> MaskOutput<B> {
        MaskOutput::new(self.mask_a.clone())
    }

    pub fn mask_psa_label(&self) -> MaskPsaLabel<B> {
        MaskPsaLabel::new(
            self.mag_mix.clone(),
            self.mag_s1.clone(),
            self.cos_s1.clone(),
        )
    }

    pub fn clean_estimate(&self) -> CleanEstimate<B> {
        CleanEstimate::new(self.mask_a.clone() * self.mag_mix.clone())
    }

    pub fn mask_msa_label(&self) -> MaskMsaLabel<B> {
        MaskMsaLabel::new(self.mag_s1.clone(), self.cos_s1.clone())
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    #[test]
    fn generated_tensors_share_the_configured_shape() {
        let device = Default::default();
        let config = MixtureConfig::new()
            .with_batch_size(1)
            .with_frames(3)
            .with_bins(4)
            .with_embedding_dim(5);

        let mixture = SyntheticMixture::<NdArray>::generate(&config, &device);

        assert_eq!(mixture.mag_mix.dims(), [1, 3, 4]);
        assert_eq!(mixture.embedding.dims(), [1, 3, 4, 5]);
        assert_eq!(mixture.one_hot().dims(), [1, 3, 4, 2]);
        assert!(mixture.chimera_output().check_shapes().is_ok());
        assert!(mixture.psa_label().check_shapes([1, 3, 4]).is_ok());
    }
}
