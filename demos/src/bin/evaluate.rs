//! Chimera Loss Evaluation Example
//!
//! Draws a synthetic two-speaker mixture, evaluates one loss formulation on it and
//! prints the loss breakdown as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Evaluate loss_msa with default configuration
//! cargo run --bin evaluate
//!
//! # Evaluate the phase-sensitive Chimera loss on a larger batch
//! cargo run --bin evaluate -- --loss chimera-psa --batch 8
//!
//! # Write the effective configuration for later runs
//! cargo run --bin evaluate -- --save-config evaluate.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::config::Config;
use chimera_demos::{create_device, evaluate, EvaluationConfig, SelectedBackend, BACKEND_NAME};
use chimera_loss::LossKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Loss formulation: msa, chimera-psa, mask-psa or mask-msa
    #[arg(short, long)]
    loss: Option<LossKind>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Override batch size
    #[arg(long)]
    batch: Option<usize>,

    /// Override number of STFT frames
    #[arg(long)]
    frames: Option<usize>,

    /// Override number of frequency bins
    #[arg(long)]
    bins: Option<usize>,

    /// Override embedding dimension
    #[arg(long)]
    embedding_dim: Option<usize>,

    /// Override random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => EvaluationConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => EvaluationConfig::new(),
    };

    // Apply command line overrides
    if let Some(loss) = args.loss {
        config.loss = loss;
    }
    if let Some(batch) = args.batch {
        config.mixture.batch_size = batch;
    }
    if let Some(frames) = args.frames {
        config.mixture.frames = frames;
    }
    if let Some(bins) = args.bins {
        config.mixture.bins = bins;
    }
    if let Some(embedding_dim) = args.embedding_dim {
        config.mixture.embedding_dim = embedding_dim;
    }
    if let Some(seed) = args.seed {
        config.mixture.seed = seed;
    }
    config.validate()?;

    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("Failed to save config file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "configuration saved");
    }

    tracing::info!(
        loss = config.loss.name(),
        batch_size = config.mixture.batch_size,
        frames = config.mixture.frames,
        bins = config.mixture.bins,
        backend = BACKEND_NAME,
        "evaluating synthetic mixture"
    );

    let device = create_device();
    let report = evaluate::<SelectedBackend>(&config, &device)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
