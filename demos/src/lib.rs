//! Chimera loss demos
//!
//! Evaluates the loss formulations of `chimera-loss` on synthetic two-speaker
//! mixtures, so configurations can be checked without a separation model.
//!
//! ## Usage
//!
//! ```bash
//! # Deep clustering + magnitude spectrum approximation with default settings
//! cargo run --bin evaluate
//!
//! # Phase-sensitive Chimera loss from a saved configuration
//! cargo run --bin evaluate -- --loss chimera-psa --config evaluate.json
//!
//! # Debug-level loss breakdown on the WGPU backend
//! RUST_LOG=debug cargo run --bin evaluate --features wgpu --no-default-features
//! ```

pub mod backend;
pub mod config;
pub mod evaluation;
pub mod mixture;

pub use backend::{create_device, SelectedBackend, SelectedDevice, BACKEND_NAME};
pub use config::{EvaluationConfig, MixtureConfig};
pub use evaluation::{evaluate, EvaluationReport};
pub use mixture::SyntheticMixture;
