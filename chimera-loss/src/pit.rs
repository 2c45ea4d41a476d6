//! Permutation-invariant minimisation.
//!
//! The order of the separated sources is not observable from the mixture, so every
//! assignment of estimates to targets is scored and the smallest score is kept. For
//! `n` sources the residual of every (estimate, target) pair is computed once and the
//! `n!` assignment scores are sums over that table.

use burn::tensor::{backend::Backend, cast::ToElement, Tensor};
use burn_extra_ops::minimum;

use crate::norm::Norm1d;

/// All permutations of `0..n` in lexicographic order, identity first.
///
/// `permutation[j]` is the estimate assigned to target `j`.
pub fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut current: Vec<usize> = (0..n).collect();
    let mut all = vec![current.clone()];

    // Narayana's next-permutation step
    loop {
        let Some(pivot) = (1..n).rev().find(|&i| current[i - 1] < current[i]) else {
            return all;
        };
        let pivot = pivot - 1;
        let successor = (pivot + 1..n)
            .rev()
            .find(|&i| current[i] > current[pivot])
            .unwrap_or(pivot + 1);
        current.swap(pivot, successor);
        current[pivot + 1..].reverse();
        all.push(current.clone());
    }
}

/// Residual norm of every (estimate, target) pair.
///
/// `result[i][j]` is `norm(estimates[i] - targets[j])`.
///
/// # Shapes
///
/// - estimates, targets: `n` tensors of `[batch_size, frames, freq]`
/// - output: `n × n` tensors of `[1]`
pub fn pairwise_residuals<B: Backend>(
    estimates: &[Tensor<B, 3>],
    targets: &[Tensor<B, 3>],
    norm: &Norm1d,
) -> Vec<Vec<Tensor<B, 1>>> {
    assert_eq!(
        estimates.len(),
        targets.len(),
        "Number of estimates ({}) must match number of targets ({})",
        estimates.len(),
        targets.len()
    );

    estimates
        .iter()
        .map(|estimate| {
            targets
                .iter()
                .map(|target| norm.forward(estimate.clone() - target.clone()))
                .collect()
        })
        .collect()
}

/// Score of every assignment in [`permutations`] order.
pub fn assignment_losses<B: Backend>(residuals: &[Vec<Tensor<B, 1>>]) -> Vec<Tensor<B, 1>> {
    permutations(residuals.len())
        .into_iter()
        .map(|permutation| {
            permutation
                .iter()
                .enumerate()
                .map(|(target, &estimate)| residuals[estimate][target].clone())
                .reduce(|acc, residual| acc + residual)
                .unwrap_or_else(|| panic!("Permutation-invariant loss needs at least one source"))
        })
        .collect()
}

/// Smallest candidate, keeping the gradient of the winning assignment only.
pub fn pit_min<B: Backend>(candidates: Vec<Tensor<B, 1>>) -> Tensor<B, 1> {
    candidates
        .into_iter()
        .reduce(minimum)
        .unwrap_or_else(|| panic!("Permutation-invariant loss needs at least one candidate"))
}

/// Index of the smallest candidate.
///
/// Reads every candidate back from the device; meant for reporting, not for the
/// training graph.
pub fn best_assignment<B: Backend>(candidates: &[Tensor<B, 1>]) -> usize {
    candidates
        .iter()
        .map(|candidate| candidate.clone().into_scalar().to_f64())
        .enumerate()
        .fold((0, f64::INFINITY), |best, (index, value)| {
            if value < best.1 {
                (index, value)
            } else {
                best
            }
        })
        .0
}

/// Permutation-invariant residual over `n` sources.
///
/// # Shapes
///
/// - estimates, targets: `n` tensors of `[batch_size, frames, freq]`
/// - output: `[1]`
pub fn permutation_invariant_loss<B: Backend>(
    estimates: &[Tensor<B, 3>],
    targets: &[Tensor<B, 3>],
    norm: &Norm1d,
) -> Tensor<B, 1> {
    let residuals = pairwise_residuals(estimates, targets, norm);
    pit_min(assignment_losses(&residuals))
}

#[cfg(test)]
mod tests {
    use burn::tensor::{TensorData, Tolerance};

    use super::*;
    use crate::tests::TestBackend;

    fn spectrogram(values: [f32; 2], device: &<TestBackend as Backend>::Device) -> Tensor<TestBackend, 3> {
        Tensor::from_data(TensorData::from([[values]]), device)
    }

    #[test]
    fn two_sources_give_identity_then_swap() {
        assert_eq!(permutations(2), vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn three_sources_give_six_distinct_assignments() {
        let all = permutations(3);

        assert_eq!(all.len(), 6);
        assert_eq!(all[0], vec![0, 1, 2]);
        assert_eq!(all[5], vec![2, 1, 0]);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn single_source_has_single_assignment() {
        assert_eq!(permutations(1), vec![vec![0]]);
    }

    #[test]
    fn swapped_estimates_find_swapped_assignment() {
        let device = Default::default();
        let norm = Norm1d::new();

        let targets = [spectrogram([1.0, 0.0], &device), spectrogram([0.0, 3.0], &device)];
        let estimates = [spectrogram([0.0, 3.0], &device), spectrogram([1.0, 0.0], &device)];

        let residuals = pairwise_residuals(&estimates, &targets, &norm);
        let candidates = assignment_losses(&residuals);

        // identity: (1 + 9) + (1 + 9), swap: 0
        candidates[0]
            .clone()
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([20.0]), Tolerance::default());
        assert_eq!(best_assignment(&candidates), 1);
        pit_min(candidates)
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([0.0]), Tolerance::default());
    }

    #[test]
    fn three_sources_recover_rotated_assignment() {
        let device = Default::default();
        let norm = Norm1d::new();

        let targets = [
            spectrogram([1.0, 0.0], &device),
            spectrogram([0.0, 2.0], &device),
            spectrogram([3.0, 3.0], &device),
        ];
        let estimates = [targets[2].clone(), targets[0].clone(), targets[1].clone()];

        let residuals = pairwise_residuals(&estimates, &targets, &norm);
        let candidates = assignment_losses(&residuals);
        let best = best_assignment(&candidates);

        // target 0 -> estimate 1, target 1 -> estimate 2, target 2 -> estimate 0
        assert_eq!(permutations(3)[best], vec![1, 2, 0]);
        permutation_invariant_loss(&estimates, &targets, &norm)
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([0.0]), Tolerance::default());
    }

    #[test]
    #[should_panic = "Number of estimates"]
    fn mismatched_source_count_panics() {
        let device = Default::default();
        let targets = [spectrogram([1.0, 0.0], &device)];
        let estimates = [spectrogram([1.0, 0.0], &device), spectrogram([1.0, 0.0], &device)];

        let _ = pairwise_residuals(&estimates, &targets, &Norm1d::new());
    }
}
