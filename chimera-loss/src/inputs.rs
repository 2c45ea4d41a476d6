//! Typed model outputs and labels.
//!
//! Every loss takes one output record and one label record with named fields. Records
//! built with `new` have their arity fixed by the type; `from_parts` and `TryFrom`
//! accept positional tensors in the documented order and report an
//! [arity error](ChimeraLossError::Arity) when the count is wrong.

use burn::tensor::{backend::Backend, Tensor};

use crate::error::{ChimeraLossError, ChimeraLossResult};

fn take_exact<B: Backend, const N: usize>(
    tensors: Vec<Tensor<B, 3>>,
    what: &'static str,
) -> ChimeraLossResult<[Tensor<B, 3>; N]> {
    <[Tensor<B, 3>; N]>::try_from(tensors).map_err(|tensors| ChimeraLossError::Arity {
        what,
        expected: N,
        actual: tensors.len(),
    })
}

fn check_leading<B: Backend, const D: usize>(
    reference: [usize; 3],
    what: &'static str,
    tensor: &Tensor<B, D>,
) -> ChimeraLossResult<()> {
    let dims = tensor.dims();
    if dims[..3] == reference {
        Ok(())
    } else {
        Err(ChimeraLossError::ShapeMismatch {
            what,
            expected: reference.to_vec(),
            actual: dims.to_vec(),
        })
    }
}

/// Output of a Chimera network: embedding head and two mask heads.
#[derive(Debug, Clone)]
pub struct ChimeraOutput<B: Backend> {
    /// `[batch_size, frames, freq, embedding_dim]`
    pub embedding: Tensor<B, 4>,
    /// `[batch_size, frames, freq]`
    pub mask_a: Tensor<B, 3>,
    /// `[batch_size, frames, freq]`
    pub mask_b: Tensor<B, 3>,
}

impl<B: Backend> ChimeraOutput<B> {
    pub const fn new(embedding: Tensor<B, 4>, mask_a: Tensor<B, 3>, mask_b: Tensor<B, 3>) -> Self {
        Self {
            embedding,
            mask_a,
            mask_b,
        }
    }

    /// Build from the embedding and the masks in `[mask_a, mask_b]` order.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::Arity`] unless exactly two masks are given.
    pub fn from_parts(embedding: Tensor<B, 4>, masks: Vec<Tensor<B, 3>>) -> ChimeraLossResult<Self> {
        let [mask_a, mask_b] = take_exact(masks, "ChimeraOutput masks")?;
        Ok(Self::new(embedding, mask_a, mask_b))
    }

    /// Build from an embedding flattened over time-frequency bins.
    ///
    /// The embedding is reshaped to the `[batch_size, frames, freq]` of `mask_a`, with
    /// bins in row-major `(frame, freq)` order.
    ///
    /// # Shapes
    ///
    /// - embedding: `[batch_size, frames * freq, embedding_dim]`
    /// - mask_a, mask_b: `[batch_size, frames, freq]`
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::ShapeMismatch`] when the embedding does not hold
    /// `frames * freq` bins for every sample of the batch.
    pub fn from_flat(
        embedding: Tensor<B, 3>,
        mask_a: Tensor<B, 3>,
        mask_b: Tensor<B, 3>,
    ) -> ChimeraLossResult<Self> {
        let [batch_size, frames, freq] = mask_a.dims();
        let [embedding_batch, bins, embedding_dim] = embedding.dims();
        if [embedding_batch, bins] != [batch_size, frames * freq] {
            return Err(ChimeraLossError::ShapeMismatch {
                what: "flat embedding",
                expected: vec![batch_size, frames * freq, embedding_dim],
                actual: embedding.dims().to_vec(),
            });
        }

        let embedding = embedding.reshape([batch_size, frames, freq, embedding_dim]);
        Ok(Self::new(embedding, mask_a, mask_b))
    }

    /// Exchange the two mask heads.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self::new(self.embedding, self.mask_b, self.mask_a)
    }

    /// Check that every tensor shares the `[batch_size, frames, freq]` of `mask_a`.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::ShapeMismatch`] naming the first offending tensor.
    pub fn check_shapes(&self) -> ChimeraLossResult<()> {
        let reference = self.mask_a.dims();
        check_leading(reference, "embedding", &self.embedding)?;
        check_leading(reference, "mask_b", &self.mask_b)
    }

    pub(crate) fn reference_shape(&self) -> [usize; 3] {
        self.mask_a.dims()
    }
}

/// Label for magnitude spectrum approximation with deep clustering.
#[derive(Debug, Clone)]
pub struct MsaLabel<B: Backend> {
    /// `[batch_size, frames, freq, num_speakers]`
    pub one_hot: Tensor<B, 4>,
    pub mag_mix: Tensor<B, 3>,
    pub mag_s1: Tensor<B, 3>,
    pub mag_s2: Tensor<B, 3>,
}

impl<B: Backend> MsaLabel<B> {
    pub const fn new(
        one_hot: Tensor<B, 4>,
        mag_mix: Tensor<B, 3>,
        mag_s1: Tensor<B, 3>,
        mag_s2: Tensor<B, 3>,
    ) -> Self {
        Self {
            one_hot,
            mag_mix,
            mag_s1,
            mag_s2,
        }
    }

    /// Build from the one-hot label and `[mag_mix, mag_s1, mag_s2]`.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::Arity`] unless exactly three spectrograms are given.
    pub fn from_parts(one_hot: Tensor<B, 4>, spectra: Vec<Tensor<B, 3>>) -> ChimeraLossResult<Self> {
        let [mag_mix, mag_s1, mag_s2] = take_exact(spectra, "MsaLabel spectrograms")?;
        Ok(Self::new(one_hot, mag_mix, mag_s1, mag_s2))
    }

    /// Exchange the two speakers.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self::new(self.one_hot, self.mag_mix, self.mag_s2, self.mag_s1)
    }

    /// Check every tensor against `reference`.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::ShapeMismatch`] naming the first offending tensor.
    pub fn check_shapes(&self, reference: [usize; 3]) -> ChimeraLossResult<()> {
        check_leading(reference, "one_hot", &self.one_hot)?;
        check_leading(reference, "mag_mix", &self.mag_mix)?;
        check_leading(reference, "mag_s1", &self.mag_s1)?;
        check_leading(reference, "mag_s2", &self.mag_s2)
    }
}

/// Label for phase-sensitive approximation with deep clustering.
#[derive(Debug, Clone)]
pub struct PsaLabel<B: Backend> {
    /// `[batch_size, frames, freq, num_speakers]`
    pub one_hot: Tensor<B, 4>,
    pub mag_mix: Tensor<B, 3>,
    pub mag_s1: Tensor<B, 3>,
    pub mag_s2: Tensor<B, 3>,
    /// Cosine of the phase difference between the mixture and speaker 1.
    pub cos_s1: Tensor<B, 3>,
    /// Cosine of the phase difference between the mixture and speaker 2.
    pub cos_s2: Tensor<B, 3>,
}

impl<B: Backend> PsaLabel<B> {
    pub const fn new(
        one_hot: Tensor<B, 4>,
        mag_mix: Tensor<B, 3>,
        mag_s1: Tensor<B, 3>,
        mag_s2: Tensor<B, 3>,
        cos_s1: Tensor<B, 3>,
        cos_s2: Tensor<B, 3>,
    ) -> Self {
        Self {
            one_hot,
            mag_mix,
            mag_s1,
            mag_s2,
            cos_s1,
            cos_s2,
        }
    }

    /// Build from the one-hot label and `[mag_mix, mag_s1, mag_s2, cos_s1, cos_s2]`.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::Arity`] unless exactly five tensors are given.
    pub fn from_parts(one_hot: Tensor<B, 4>, spectra: Vec<Tensor<B, 3>>) -> ChimeraLossResult<Self> {
        let [mag_mix, mag_s1, mag_s2, cos_s1, cos_s2] =
            take_exact(spectra, "PsaLabel spectrograms")?;
        Ok(Self::new(one_hot, mag_mix, mag_s1, mag_s2, cos_s1, cos_s2))
    }

    /// Exchange the two speakers, magnitudes and phase cosines together.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self::new(
            self.one_hot,
            self.mag_mix,
            self.mag_s2,
            self.mag_s1,
            self.cos_s2,
            self.cos_s1,
        )
    }

    /// Check every tensor against `reference`.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::ShapeMismatch`] naming the first offending tensor.
    pub fn check_shapes(&self, reference: [usize; 3]) -> ChimeraLossResult<()> {
        check_leading(reference, "one_hot", &self.one_hot)?;
        check_leading(reference, "mag_mix", &self.mag_mix)?;
        check_leading(reference, "mag_s1", &self.mag_s1)?;
        check_leading(reference, "mag_s2", &self.mag_s2)?;
        check_leading(reference, "cos_s1", &self.cos_s1)?;
        check_leading(reference, "cos_s2", &self.cos_s2)
    }
}

/// Output of a single-mask enhancement network.
#[derive(Debug, Clone)]
pub struct MaskOutput<B: Backend> {
    /// `[batch_size, frames, freq]`
    pub mask: Tensor<B, 3>,
}

impl<B: Backend> MaskOutput<B> {
    pub const fn new(mask: Tensor<B, 3>) -> Self {
        Self { mask }
    }
}

impl<B: Backend> TryFrom<Vec<Tensor<B, 3>>> for MaskOutput<B> {
    type Error = ChimeraLossError;

    fn try_from(tensors: Vec<Tensor<B, 3>>) -> ChimeraLossResult<Self> {
        let [mask] = take_exact(tensors, "MaskOutput")?;
        Ok(Self::new(mask))
    }
}

/// Label for single-mask phase-sensitive approximation.
#[derive(Debug, Clone)]
pub struct MaskPsaLabel<B: Backend> {
    pub mag_noisy: Tensor<B, 3>,
    pub mag_clean: Tensor<B, 3>,
    /// Cosine of the phase difference between the noisy and clean signals.
    pub cos_diff: Tensor<B, 3>,
}

impl<B: Backend> MaskPsaLabel<B> {
    pub const fn new(mag_noisy: Tensor<B, 3>, mag_clean: Tensor<B, 3>, cos_diff: Tensor<B, 3>) -> Self {
        Self {
            mag_noisy,
            mag_clean,
            cos_diff,
        }
    }

    /// Check every tensor against `reference`.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::ShapeMismatch`] naming the first offending tensor.
    pub fn check_shapes(&self, reference: [usize; 3]) -> ChimeraLossResult<()> {
        check_leading(reference, "mag_noisy", &self.mag_noisy)?;
        check_leading(reference, "mag_clean", &self.mag_clean)?;
        check_leading(reference, "cos_diff", &self.cos_diff)
    }
}

impl<B: Backend> TryFrom<Vec<Tensor<B, 3>>> for MaskPsaLabel<B> {
    type Error = ChimeraLossError;

    fn try_from(tensors: Vec<Tensor<B, 3>>) -> ChimeraLossResult<Self> {
        let [mag_noisy, mag_clean, cos_diff] = take_exact(tensors, "MaskPsaLabel")?;
        Ok(Self::new(mag_noisy, mag_clean, cos_diff))
    }
}

/// Output of a network that estimates the clean magnitude directly.
#[derive(Debug, Clone)]
pub struct CleanEstimate<B: Backend> {
    /// `[batch_size, frames, freq]`
    pub clean_est: Tensor<B, 3>,
}

impl<B: Backend> CleanEstimate<B> {
    pub const fn new(clean_est: Tensor<B, 3>) -> Self {
        Self { clean_est }
    }
}

impl<B: Backend> TryFrom<Vec<Tensor<B, 3>>> for CleanEstimate<B> {
    type Error = ChimeraLossError;

    fn try_from(tensors: Vec<Tensor<B, 3>>) -> ChimeraLossResult<Self> {
        let [clean_est] = take_exact(tensors, "CleanEstimate")?;
        Ok(Self::new(clean_est))
    }
}

/// Label for direct magnitude regression.
#[derive(Debug, Clone)]
pub struct MaskMsaLabel<B: Backend> {
    pub mag_clean: Tensor<B, 3>,
    /// Carried for signature compatibility with [`MaskPsaLabel`]; not read by the loss.
    pub cos_diff: Tensor<B, 3>,
}

impl<B: Backend> MaskMsaLabel<B> {
    pub const fn new(mag_clean: Tensor<B, 3>, cos_diff: Tensor<B, 3>) -> Self {
        Self {
            mag_clean,
            cos_diff,
        }
    }

    /// Check every tensor against `reference`.
    ///
    /// # Errors
    /// Returns [`ChimeraLossError::ShapeMismatch`] naming the first offending tensor.
    pub fn check_shapes(&self, reference: [usize; 3]) -> ChimeraLossResult<()> {
        check_leading(reference, "mag_clean", &self.mag_clean)?;
        check_leading(reference, "cos_diff", &self.cos_diff)
    }
}

impl<B: Backend> TryFrom<Vec<Tensor<B, 3>>> for MaskMsaLabel<B> {
    type Error = ChimeraLossError;

    fn try_from(tensors: Vec<Tensor<B, 3>>) -> ChimeraLossResult<Self> {
        let [mag_clean, cos_diff] = take_exact(tensors, "MaskMsaLabel")?;
        Ok(Self::new(mag_clean, cos_diff))
    }
}
