//! Chimera loss: deep clustering on the embedding head plus permutation-invariant
//! mask inference on the two mask heads.
//!
//! ```text
//! L = w_e * DC(V, Y) + w_m * min_π Σ_j norm(M_π(j) ⊙ |X| − T_j)
//! ```
//!
//! `T_j` is the clean magnitude `|S_j|` for magnitude spectrum approximation, or the
//! phase-sensitive target `min(|X|, relu(|S_j| cos θ_j))` for phase-sensitive
//! approximation. The default weights are `w_e = 0.975` and `w_m = 0.025`.

use std::collections::HashMap;

use burn::{
    config::Config,
    module::Module,
    tensor::{backend::Backend, cast::ToElement, Tensor},
};
use burn_extra_ops::phase_sensitive_target;

use crate::{
    deep_clustering::{DeepClusteringLoss, DeepClusteringLossConfig},
    error::ChimeraLossResult,
    inputs::{ChimeraOutput, MsaLabel, PsaLabel},
    norm::{Norm1d, Norm1dConfig},
    pit::{assignment_losses, best_assignment, pairwise_residuals, pit_min},
};

/// Configuration for creating a [Chimera loss](ChimeraLoss).
///
/// The weights balance the terms as they are computed here: the deep clustering term
/// is divided by `N²` (`N = frames * freq`) unless
/// [`normalize`](DeepClusteringLossConfig::normalize) is turned off, while the mask term
/// is a per-sample sum over all bins. Weights tuned against an unnormalised deep
/// clustering loss need rescaling, or `normalize = false`.
#[derive(Config, Debug)]
pub struct ChimeraLossConfig {
    /// Weight of the deep clustering term. Default: 0.975
    #[config(default = 0.975)]
    pub embedding_weight: f64,
    /// Weight of the mask inference term. Default: 0.025
    #[config(default = 0.025)]
    pub mask_weight: f64,
    /// Norm applied to mask residuals.
    #[config(default = "Norm1dConfig::new()")]
    pub norm: Norm1dConfig,
    /// Deep clustering term.
    #[config(default = "DeepClusteringLossConfig::new()")]
    pub deep_clustering: DeepClusteringLossConfig,
}

impl ChimeraLossConfig {
    /// Initialize a [Chimera loss](ChimeraLoss).
    pub fn init(&self) -> ChimeraLoss {
        self.assertions();
        ChimeraLoss {
            embedding_weight: self.embedding_weight,
            mask_weight: self.mask_weight,
            norm: self.norm.init(),
            deep_clustering: self.deep_clustering.init(),
        }
    }

    fn assertions(&self) {
        assert!(
            self.embedding_weight >= 0.0 && self.mask_weight >= 0.0,
            "Weights for ChimeraLoss must be non-negative, got embedding {} and mask {}",
            self.embedding_weight,
            self.mask_weight
        );
        assert!(
            self.embedding_weight + self.mask_weight > 0.0,
            "At least one ChimeraLoss weight must be positive"
        );
    }
}

/// Weighted deep clustering and two-speaker mask inference loss.
#[derive(Module, Clone, Debug)]
pub struct ChimeraLoss {
    /// Weight of the deep clustering term.
    pub embedding_weight: f64,
    /// Weight of the mask inference term.
    pub mask_weight: f64,
    /// Residual norm.
    pub norm: Norm1d,
    /// Deep clustering criterion.
    pub deep_clustering: DeepClusteringLoss,
}

impl Default for ChimeraLoss {
    fn default() -> Self {
        Self::new()
    }
}

/// Unweighted terms of one evaluation.
struct Terms<B: Backend> {
    embedding: Tensor<B, 1>,
    candidates: Vec<Tensor<B, 1>>,
}

impl ChimeraLoss {
    /// Create a new Chimera loss with default configuration.
    pub fn new() -> Self {
        ChimeraLossConfig::new().init()
    }

    /// Magnitude spectrum approximation against the clean magnitudes.
    ///
    /// # Shapes
    ///
    /// - embedding: `[batch_size, frames, freq, embedding_dim]`
    /// - one_hot: `[batch_size, frames, freq, num_speakers]`
    /// - masks and magnitudes: `[batch_size, frames, freq]`
    /// - output: `[1]`
    pub fn forward_msa<B: Backend>(&self, output: ChimeraOutput<B>, label: MsaLabel<B>) -> Tensor<B, 1> {
        let terms = self.msa_terms(output, label);
        self.combine(terms.embedding, pit_min(terms.candidates))
    }

    /// Phase-sensitive approximation against `min(|X|, relu(|S_j| cos θ_j))`.
    ///
    /// # Shapes
    ///
    /// - embedding: `[batch_size, frames, freq, embedding_dim]`
    /// - one_hot: `[batch_size, frames, freq, num_speakers]`
    /// - masks, magnitudes and cosines: `[batch_size, frames, freq]`
    /// - output: `[1]`
    pub fn forward_psa<B: Backend>(&self, output: ChimeraOutput<B>, label: PsaLabel<B>) -> Tensor<B, 1> {
        let terms = self.psa_terms(output, label);
        self.combine(terms.embedding, pit_min(terms.candidates))
    }

    /// [`forward_msa`](Self::forward_msa) with a breakdown for monitoring.
    ///
    /// The breakdown holds the unweighted `embedding` and `mask` terms, the weighted
    /// `total`, and the index of the winning `assignment` (0: mask A to speaker 1,
    /// 1: mask A to speaker 2).
    pub fn forward_msa_detailed<B: Backend>(
        &self,
        output: ChimeraOutput<B>,
        label: MsaLabel<B>,
    ) -> (Tensor<B, 1>, HashMap<String, f64>) {
        let terms = self.msa_terms(output, label);
        self.detailed(terms)
    }

    /// [`forward_psa`](Self::forward_psa) with a breakdown for monitoring.
    ///
    /// See [`forward_msa_detailed`](Self::forward_msa_detailed) for the keys.
    pub fn forward_psa_detailed<B: Backend>(
        &self,
        output: ChimeraOutput<B>,
        label: PsaLabel<B>,
    ) -> (Tensor<B, 1>, HashMap<String, f64>) {
        let terms = self.psa_terms(output, label);
        self.detailed(terms)
    }

    fn msa_terms<B: Backend>(&self, output: ChimeraOutput<B>, label: MsaLabel<B>) -> Terms<B> {
        assertions(output.check_shapes());
        assertions(label.check_shapes(output.reference_shape()));

        self.terms(
            output,
            label.one_hot,
            label.mag_mix,
            [label.mag_s1, label.mag_s2],
        )
    }

    fn psa_terms<B: Backend>(&self, output: ChimeraOutput<B>, label: PsaLabel<B>) -> Terms<B> {
        assertions(output.check_shapes());
        assertions(label.check_shapes(output.reference_shape()));

        let targets = [
            phase_sensitive_target(label.mag_s1, label.cos_s1, label.mag_mix.clone()),
            phase_sensitive_target(label.mag_s2, label.cos_s2, label.mag_mix.clone()),
        ];
        self.terms(output, label.one_hot, label.mag_mix, targets)
    }

    fn terms<B: Backend>(
        &self,
        output: ChimeraOutput<B>,
        one_hot: Tensor<B, 4>,
        mag_mix: Tensor<B, 3>,
        targets: [Tensor<B, 3>; 2],
    ) -> Terms<B> {
        let embedding = self.deep_clustering.forward(output.embedding, one_hot);

        let estimates = [output.mask_a * mag_mix.clone(), output.mask_b * mag_mix];
        let residuals = pairwise_residuals(&estimates, &targets, &self.norm);

        Terms {
            embedding,
            candidates: assignment_losses(&residuals),
        }
    }

    fn combine<B: Backend>(&self, embedding: Tensor<B, 1>, mask: Tensor<B, 1>) -> Tensor<B, 1> {
        embedding.mul_scalar(self.embedding_weight) + mask.mul_scalar(self.mask_weight)
    }

    fn detailed<B: Backend>(&self, terms: Terms<B>) -> (Tensor<B, 1>, HashMap<String, f64>) {
        let assignment = best_assignment(&terms.candidates);
        let mask = pit_min(terms.candidates);
        let total = self.combine(terms.embedding.clone(), mask.clone());

        let embedding_value = terms.embedding.into_scalar().to_f64();
        let mask_value = mask.into_scalar().to_f64();
        let total_value = total.clone().into_scalar().to_f64();
        tracing::debug!(
            embedding = embedding_value,
            mask = mask_value,
            total = total_value,
            assignment,
            "chimera loss terms"
        );

        let mut loss_dict = HashMap::new();
        loss_dict.insert("embedding".to_owned(), embedding_value);
        loss_dict.insert("mask".to_owned(), mask_value);
        loss_dict.insert("total".to_owned(), total_value);
        loss_dict.insert("assignment".to_owned(), assignment as f64);

        (total, loss_dict)
    }
}

fn assertions(result: ChimeraLossResult<()>) {
    if let Err(err) = result {
        panic!("Invalid ChimeraLoss input: {err}");
    }
}
