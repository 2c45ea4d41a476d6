//! Ground-truth helpers for the deep clustering term.

use burn::tensor::{backend::Backend, Tensor};

/// One-hot assignment of every time-frequency bin to its loudest speaker.
///
/// Ties go to the lower speaker index.
///
/// # Shapes
///
/// - magnitudes: `num_speakers` tensors of `[batch_size, frames, freq]`
/// - output: `[batch_size, frames, freq, num_speakers]`
pub fn dominant_speaker_one_hot<B: Backend>(magnitudes: &[Tensor<B, 3>]) -> Tensor<B, 4> {
    let (first, rest) = magnitudes
        .split_first()
        .unwrap_or_else(|| panic!("At least one speaker magnitude is required"));

    let mut loudest = first.clone();
    let mut winner = first.zeros_like();
    for (speaker, magnitude) in rest.iter().enumerate() {
        assert_eq!(
            magnitude.dims(),
            first.dims(),
            "Shape of speaker {} magnitude must match speaker 0",
            speaker + 1
        );
        let louder = magnitude.clone().greater(loudest.clone());
        loudest = loudest.mask_where(louder.clone(), magnitude.clone());
        winner = winner.mask_fill(louder, (speaker + 1) as f64);
    }

    let columns = (0..magnitudes.len())
        .map(|speaker| {
            winner
                .clone()
                .equal_elem(speaker as f64)
                .float()
                .unsqueeze_dim::<4>(3)
        })
        .collect();
    Tensor::cat(columns, 3)
}

#[cfg(test)]
mod tests {
    use burn::tensor::{TensorData, Tolerance};

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn two_speakers_mark_louder_source_with_ties_to_first() {
        let device = Default::default();
        let mag_s1 = Tensor::<TestBackend, 3>::from_data(
            TensorData::from([[[3.0, 1.0], [2.0, 1.0]]]),
            &device,
        );
        let mag_s2 = Tensor::from_data(TensorData::from([[[1.0, 1.0], [2.0, 3.0]]]), &device);

        let one_hot = dominant_speaker_one_hot(&[mag_s1, mag_s2]);

        assert_eq!(one_hot.dims(), [1, 2, 2, 2]);
        one_hot.into_data().assert_approx_eq::<f32>(
            &TensorData::from([[[[1.0, 0.0], [1.0, 0.0]], [[1.0, 0.0], [0.0, 1.0]]]]),
            Tolerance::default(),
        );
    }

    #[test]
    fn three_speakers_rows_sum_to_one() {
        let device = Default::default();
        let magnitudes = [
            Tensor::<TestBackend, 3>::from_data(TensorData::from([[[0.1, 5.0, 1.0]]]), &device),
            Tensor::from_data(TensorData::from([[[0.2, 4.0, 1.0]]]), &device),
            Tensor::from_data(TensorData::from([[[0.3, 6.0, 1.0]]]), &device),
        ];

        let one_hot = dominant_speaker_one_hot(&magnitudes);

        one_hot.clone().sum_dim(3).into_data().assert_approx_eq::<f32>(
            &TensorData::from([[[[1.0], [1.0], [1.0]]]]),
            Tolerance::default(),
        );
        one_hot.into_data().assert_approx_eq::<f32>(
            &TensorData::from([[[[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]]]),
            Tolerance::default(),
        );
    }

    #[test]
    #[should_panic = "At least one speaker magnitude is required"]
    fn empty_input_panics() {
        let _ = dominant_speaker_one_hot::<TestBackend>(&[]);
    }
}
