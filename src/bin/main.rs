//! hogwild-svm command line interface
//!
//! Trains, evaluates and inspects linear SVM models over libsvm-format data
//! using block storage and lock-free parallel SGD.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use hogwild_svm::persistence::{SerializableModel, TrainingParams};
use hogwild_svm::train::metrics;
use hogwild_svm::{BlockLoader, Result, Trainer};
use log::{error, info};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "hogwild-svm")]
#[command(about = "Lock-free parallel SGD training for linear SVMs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new model
    Train(TrainArgs),
    /// Evaluate a saved model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (libsvm format)
    #[arg(long)]
    data: PathBuf,

    /// Output model file (optional)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short, long, default_value = "1")]
    workers: usize,

    /// Number of training epochs
    #[arg(short, long, default_value = "20")]
    epochs: usize,

    /// Regularization weight mu
    #[arg(long, default_value = "1.0")]
    mu: f64,

    /// Initial SGD step size
    #[arg(long, default_value = "0.1")]
    step_size: f64,

    /// Multiplicative per-epoch step decay
    #[arg(long, default_value = "0.99")]
    step_decay: f64,

    /// Storage block size in bytes
    #[arg(long)]
    block_bytes: Option<usize>,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file (libsvm format)
    #[arg(long)]
    data: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Evaluate(args) => run_evaluate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_blocks(path: &PathBuf, block_bytes: Option<usize>) -> Result<Vec<hogwild_svm::SparseBlock>> {
    let mut loader = BlockLoader::new();
    if let Some(bytes) = block_bytes {
        loader = loader.with_block_bytes(bytes);
    }
    loader.load_file(path)
}

fn run_train(args: TrainArgs) -> Result<()> {
    info!("Loading training data from {:?}", args.data);
    let blocks = load_blocks(&args.data, args.block_bytes)?;
    let num_rows: usize = blocks.iter().map(|b| b.num_rows()).sum();
    info!("Loaded {} rows into {} blocks", num_rows, blocks.len());

    info!(
        "Training: {} workers, {} epochs, mu={}, step_size={}, step_decay={}",
        args.workers, args.epochs, args.mu, args.step_size, args.step_decay
    );
    let model = Trainer::new()
        .with_workers(args.workers)
        .with_epochs(args.epochs)
        .with_mu(args.mu)
        .with_step_size(args.step_size)
        .with_step_decay(args.step_decay)
        .train(&blocks)?;

    let wrong = metrics::fraction_misclassified(model.as_slice(), &blocks)?;
    let loss = metrics::hinge_loss(model.as_slice(), &blocks)?;
    println!("Training error: {:.2}%", wrong * 100.0);
    println!("Hinge loss: {loss:.6}");

    if let Some(output) = args.output {
        let serializable = SerializableModel::new(
            &model,
            TrainingParams {
                mu: args.mu,
                step_size: args.step_size,
                step_decay: args.step_decay,
                epochs: args.epochs,
                num_workers: args.workers,
            },
        );
        serializable.save_to_file(&output)?;
        info!("Model saved to {output:?}");
    }

    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from {:?}", args.model);
    let model = SerializableModel::load_from_file(&args.model)?;
    let theta = model.to_dense_vector();

    info!("Loading test data from {:?}", args.data);
    let blocks = load_blocks(&args.data, None)?;

    let wrong = metrics::fraction_misclassified(theta.as_slice(), &blocks)?;
    let rms = metrics::rms_error(theta.as_slice(), &blocks)?;
    let loss = metrics::hinge_loss(theta.as_slice(), &blocks)?;

    println!("Accuracy: {:.2}%", (1.0 - wrong) * 100.0);
    println!("RMS error: {rms:.6}");
    println!("Hinge loss: {loss:.6}");
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let model = SerializableModel::load_from_file(&args.model)?;
    model.print_summary();
    Ok(())
}
