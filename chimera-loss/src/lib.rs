//! Loss functions for Chimera speech separation and mask-based enhancement.
//!
//! A Chimera network has two heads over the mixture spectrogram: an embedding head
//! trained with deep clustering and a mask-inference head trained to reconstruct the
//! clean sources. This crate provides the losses for both heads using the Burn deep
//! learning framework, generic over any backend.
//!
//! ## Loss Formulations
//!
//! | Function | Output | Label |
//! |---|---|---|
//! | [`loss_msa`] | [`ChimeraOutput`] | [`MsaLabel`] |
//! | [`loss_chimera_psa`] | [`ChimeraOutput`] | [`PsaLabel`] |
//! | [`loss_mask_psa`] | [`MaskOutput`] | [`MaskPsaLabel`] |
//! | [`loss_mask_msa`] | [`CleanEstimate`] | [`MaskMsaLabel`] |
//!
//! The two-speaker formulations weight deep clustering by `0.975` and the mask term by
//! `0.025`, and score the mask term on the cheaper of the two mask-to-speaker
//! assignments. [`LossKind`] names the formulations for drivers that select one at
//! runtime.
//!
//! ## Building Blocks
//!
//! - **[`DeepClusteringLoss`]**: affinity loss between embeddings and one-hot labels
//! - **[`Norm1d`]**: per-batch averaged residual norm
//! - **[`pit`]**: permutation-invariant minimisation over any number of sources
//! - **[`dominant_speaker_one_hot`]**: one-hot labels from clean magnitudes
//!
//! ## Usage Example
//!
//! ```rust
//! use burn::prelude::*;
//! use chimera_loss::{ChimeraLossConfig, ChimeraOutput, MsaLabel};
//!
//! fn chimera_step<B: Backend>(output: ChimeraOutput<B>, label: MsaLabel<B>) -> Tensor<B, 1> {
//!     let loss = ChimeraLossConfig::new()
//!         .with_embedding_weight(0.9)
//!         .with_mask_weight(0.1)
//!         .init();
//!
//!     loss.forward_msa(output, label)
//! }
//! ```

mod chimera;
mod deep_clustering;
mod error;
mod functional;
mod inputs;
mod kind;
mod label;
mod mask;
mod norm;
pub mod pit;

pub use burn_extra_ops::NormOrder;
pub use chimera::{ChimeraLoss, ChimeraLossConfig};
pub use deep_clustering::{DeepClusteringLoss, DeepClusteringLossConfig};
pub use error::{ChimeraLossError, ChimeraLossResult};
pub use functional::{loss_chimera_psa, loss_mask_msa, loss_mask_psa, loss_msa};
pub use inputs::{
    ChimeraOutput, CleanEstimate, MaskMsaLabel, MaskOutput, MaskPsaLabel, MsaLabel, PsaLabel,
};
pub use kind::LossKind;
pub use label::dominant_speaker_one_hot;
pub use mask::{MaskLoss, MaskLossConfig};
pub use norm::{Norm1d, Norm1dConfig};
