//! The four loss formulations evaluated with their default configuration.
//!
//! Each function is a thin wrapper over [`ChimeraLoss`] or [`MaskLoss`]; build those
//! from their configs to change weights or the residual norm.

use burn::tensor::{backend::Backend, Tensor};

use crate::{
    chimera::ChimeraLoss,
    inputs::{CleanEstimate, ChimeraOutput, MaskMsaLabel, MaskOutput, MaskPsaLabel, MsaLabel, PsaLabel},
    mask::MaskLoss,
};

/// `0.975 * DC + 0.025 * min_π Σ ||M_π(j) ⊙ |X| − |S_j|||²`
pub fn loss_msa<B: Backend>(output: ChimeraOutput<B>, label: MsaLabel<B>) -> Tensor<B, 1> {
    ChimeraLoss::new().forward_msa(output, label)
}

/// `0.975 * DC + 0.025 * min_π Σ ||M_π(j) ⊙ |X| − min(|X|, relu(|S_j| cos θ_j))||²`
pub fn loss_chimera_psa<B: Backend>(output: ChimeraOutput<B>, label: PsaLabel<B>) -> Tensor<B, 1> {
    ChimeraLoss::new().forward_psa(output, label)
}

/// `||M ⊙ |Y| − min(|Y|, relu(|S| cos θ))||²`
pub fn loss_mask_psa<B: Backend>(output: MaskOutput<B>, label: MaskPsaLabel<B>) -> Tensor<B, 1> {
    MaskLoss::new().forward_psa(output, label)
}

/// `mean((Ŝ − |S|)²)`; `cos_diff` is not read. See [`MaskLoss::forward_msa`].
pub fn loss_mask_msa<B: Backend>(output: CleanEstimate<B>, label: MaskMsaLabel<B>) -> Tensor<B, 1> {
    MaskLoss::new().forward_msa(output, label)
}
