//! Deep clustering loss.
//!
//! Trains one embedding per time-frequency bin so that bins dominated by the same
//! speaker have similar embeddings. With `V` the `[N, D]` embeddings and `Y` the
//! `[N, C]` one-hot speaker assignment of the `N = frames * freq` bins of a sample:
//!
//! ```text
//! L = ||V Vᵀ − Y Yᵀ||²_F
//!   = ||Vᵀ V||²_F − 2 ||Vᵀ Y||²_F + ||Yᵀ Y||²_F
//! ```
//!
//! The right-hand side only involves `D × D`, `D × C` and `C × C` products, so the
//! `N × N` affinity matrices are never built.

use burn::{
    config::Config,
    module::Module,
    tensor::{backend::Backend, Tensor},
};

/// Configuration for creating a [deep clustering loss](DeepClusteringLoss).
#[derive(Config, Debug)]
pub struct DeepClusteringLossConfig {
    /// Divide each sample's loss by the number of bin pairs `N²`. Default: true
    #[config(default = "true")]
    pub normalize: bool,
}

impl DeepClusteringLossConfig {
    /// Initialize a [deep clustering loss](DeepClusteringLoss).
    pub const fn init(&self) -> DeepClusteringLoss {
        DeepClusteringLoss {
            normalize: self.normalize,
        }
    }
}

/// Affinity-based deep clustering loss.
#[derive(Module, Clone, Debug)]
pub struct DeepClusteringLoss {
    /// Whether the loss is divided by the number of bin pairs.
    pub normalize: bool,
}

impl Default for DeepClusteringLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepClusteringLoss {
    /// Create a new deep clustering loss with default configuration.
    pub fn new() -> Self {
        DeepClusteringLossConfig::new().init()
    }

    /// Compute the loss on spectrogram-shaped embeddings, averaged over the batch.
    ///
    /// # Shapes
    ///
    /// - embedding: `[batch_size, frames, freq, embedding_dim]`
    /// - one_hot: `[batch_size, frames, freq, num_speakers]`
    /// - output: `[1]`
    pub fn forward<B: Backend>(&self, embedding: Tensor<B, 4>, one_hot: Tensor<B, 4>) -> Tensor<B, 1> {
        self.forward_no_reduction(embedding, one_hot).mean()
    }

    /// Compute the loss for every sample of the batch.
    ///
    /// # Shapes
    ///
    /// - embedding: `[batch_size, frames, freq, embedding_dim]`
    /// - one_hot: `[batch_size, frames, freq, num_speakers]`
    /// - output: `[batch_size]`
    pub fn forward_no_reduction<B: Backend>(
        &self,
        embedding: Tensor<B, 4>,
        one_hot: Tensor<B, 4>,
    ) -> Tensor<B, 1> {
        let [batch_size, frames, freq, embedding_dim] = embedding.dims();
        let [label_batch, label_frames, label_freq, num_speakers] = one_hot.dims();
        assert_eq!(
            [batch_size, frames, freq],
            [label_batch, label_frames, label_freq],
            "Leading shape of embedding ({:?}) must match one-hot label ({:?})",
            embedding.dims(),
            one_hot.dims()
        );

        let bins = frames * freq;
        self.forward_flat_no_reduction(
            embedding.reshape([batch_size, bins, embedding_dim]),
            one_hot.reshape([batch_size, bins, num_speakers]),
        )
    }

    /// Compute the loss on flattened embeddings, averaged over the batch.
    ///
    /// # Shapes
    ///
    /// - embedding: `[batch_size, bins, embedding_dim]`
    /// - one_hot: `[batch_size, bins, num_speakers]`
    /// - output: `[1]`
    pub fn forward_flat<B: Backend>(
        &self,
        embedding: Tensor<B, 3>,
        one_hot: Tensor<B, 3>,
    ) -> Tensor<B, 1> {
        self.forward_flat_no_reduction(embedding, one_hot).mean()
    }

    /// Compute the loss on flattened embeddings for every sample of the batch.
    ///
    /// # Shapes
    ///
    /// - embedding: `[batch_size, bins, embedding_dim]`
    /// - one_hot: `[batch_size, bins, num_speakers]`
    /// - output: `[batch_size]`
    pub fn forward_flat_no_reduction<B: Backend>(
        &self,
        embedding: Tensor<B, 3>,
        one_hot: Tensor<B, 3>,
    ) -> Tensor<B, 1> {
        let [batch_size, bins, _] = embedding.dims();
        let [label_batch, label_bins, _] = one_hot.dims();
        assert_eq!(
            [batch_size, bins],
            [label_batch, label_bins],
            "Bins of embedding ({:?}) must match one-hot label ({:?})",
            embedding.dims(),
            one_hot.dims()
        );

        let embedding_t = embedding.clone().swap_dims(1, 2);
        let one_hot_t = one_hot.clone().swap_dims(1, 2);

        let vv = squared_frobenius(embedding_t.clone().matmul(embedding));
        let vy = squared_frobenius(embedding_t.matmul(one_hot.clone()));
        let yy = squared_frobenius(one_hot_t.matmul(one_hot));

        let loss = vv - vy.mul_scalar(2.0) + yy;
        if self.normalize {
            loss.div_scalar((bins * bins) as f64)
        } else {
            loss
        }
    }
}

/// `[batch, rows, cols]` -> `[batch]` sum of squared entries.
fn squared_frobenius<B: Backend>(matrix: Tensor<B, 3>) -> Tensor<B, 1> {
    let [batch_size, _, _] = matrix.dims();
    matrix
        .powf_scalar(2.0)
        .sum_dim(2)
        .sum_dim(1)
        .reshape([batch_size])
}
