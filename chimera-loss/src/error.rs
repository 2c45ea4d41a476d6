use thiserror::Error;

/// Errors raised when assembling loss inputs or selecting a loss.
///
/// Loss evaluation itself does not return errors: a shape mismatch reaching a
/// `forward` call is a caller bug and panics with the same message.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChimeraLossError {
    /// Wrong number of positional tensors for an output or label record.
    #[error("{what} expects {expected} tensors, got {actual}")]
    Arity {
        /// Record being assembled.
        what: &'static str,
        /// Number of tensors the record holds.
        expected: usize,
        /// Number of tensors provided.
        actual: usize,
    },

    /// Two tensors of one call disagree on their shared leading shape.
    #[error("shape of {what} ({actual:?}) must match {expected:?}")]
    ShapeMismatch {
        /// Tensor that does not match the reference shape.
        what: &'static str,
        /// Reference `[batch, frames, freq]` shape.
        expected: Vec<usize>,
        /// Shape found.
        actual: Vec<usize>,
    },

    /// Name that does not match any [loss formulation](crate::LossKind).
    #[error("unknown loss formulation: {name}")]
    UnknownLoss {
        /// The name that was given.
        name: String,
    },
}

/// A specialized `Result` type for loss input assembly.
pub type ChimeraLossResult<T> = Result<T, ChimeraLossError>;
