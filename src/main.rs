//! Command-line front end of the neural network playground.
//!
//!   playground train --config session.json --heatmap boundary.png
//!   playground xor
//!   playground init-config session.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use neural_playground::dataset::{extract, span};
use neural_playground::heatmap::{classify, render_png};
use neural_playground::{
    ActivationFunction, Layer, LossType, Matrix, Network, PlaygroundConfig, TrainingSession,
};

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "Train small dense networks on 2D toy datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset and train a network on it
    Train {
        /// Session configuration (JSON); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured number of epochs
        #[arg(long)]
        epochs: Option<usize>,

        /// Override the configured learning rate
        #[arg(long)]
        learning_rate: Option<f64>,

        /// Stop as soon as an epoch's mean error drops below this value
        #[arg(long)]
        target_error: Option<f64>,

        /// Seed for the dataset generator
        #[arg(long)]
        seed: Option<u64>,

        /// Log every n-th epoch
        #[arg(long, default_value = "10")]
        log_every: usize,

        /// Write the trained network as JSON
        #[arg(long)]
        save: Option<PathBuf>,

        /// Write the decision boundary as a PNG
        #[arg(long)]
        heatmap: Option<PathBuf>,

        /// Heat map width and height in pixels
        #[arg(long, default_value = "500")]
        pixels: u32,
    },

    /// Train the classic 2-3-1 tanh network on XOR
    Xor {
        #[arg(long, default_value = "1000")]
        epochs: usize,

        #[arg(long, default_value = "0.1")]
        learning_rate: f64,
    },

    /// Write the default session configuration
    InitConfig {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            config,
            epochs,
            learning_rate,
            target_error,
            seed,
            log_every,
            save,
            heatmap,
            pixels,
        } => {
            let mut config = match config {
                Some(path) => PlaygroundConfig::load_json(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => PlaygroundConfig::default(),
            };
            if let Some(epochs) = epochs {
                config.epochs = epochs;
            }
            if let Some(lr) = learning_rate {
                config.learning_rate = lr;
            }
            config.validate()?;

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            run_train(&config, &mut rng, target_error, log_every.max(1), save, heatmap, pixels)
        }
        Commands::Xor { epochs, learning_rate } => run_xor(epochs, learning_rate),
        Commands::InitConfig { path } => {
            PlaygroundConfig::default().save_json(&path)?;
            info!(path = %path.display(), "default configuration written");
            Ok(())
        }
    }
}

fn run_train(
    config: &PlaygroundConfig,
    rng: &mut StdRng,
    target_error: Option<f64>,
    log_every: usize,
    save: Option<PathBuf>,
    heatmap: Option<PathBuf>,
    pixels: u32,
) -> Result<()> {
    let points = config.dataset.generate(rng, config.dataset_size(), config.outputs)?;
    let (x_train, y_train) = extract(&points, &config.features, config.outputs)?;
    let network = config.build_network()?;

    info!(
        dataset = ?config.dataset,
        points = points.len(),
        widths = ?network.widths(),
        activation = %config.activation,
        "starting session"
    );

    let session = TrainingSession::spawn(network, x_train, y_train, config.train_config());
    for stats in session.progress() {
        if stats.epoch % log_every == 0 || stats.epoch == stats.total_epochs {
            info!(epoch = stats.epoch, error = stats.error, ms = stats.elapsed_ms, "progress");
        }
        if target_error.is_some_and(|target| stats.error < target) {
            info!(epoch = stats.epoch, "target error reached");
            session.stop();
        }
    }

    let (mut network, outcome) = session.join()?;
    let error = outcome?;
    info!(epoch = network.epoch(), error, "training done");

    if let Some(path) = save {
        network.save_json(&path)?;
        info!(path = %path.display(), "network saved");
    }

    if let Some(path) = heatmap {
        let resolution = config.resolution.cells();
        let grid = span(resolution, &config.features)?;
        let cells = classify(&mut network, &grid)?;
        render_png(&cells, &points, resolution, pixels, &path)?;
        info!(path = %path.display(), "heat map written");
    }

    Ok(())
}

fn run_xor(epochs: usize, learning_rate: f64) -> Result<()> {
    let x_train = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
        .iter()
        .map(|r| Matrix::row(r.to_vec()))
        .collect::<neural_playground::Result<Vec<_>>>()?;
    let y_train = [0.0, 1.0, 1.0, 0.0]
        .iter()
        .map(|&v| Matrix::row(vec![v]))
        .collect::<neural_playground::Result<Vec<_>>>()?;

    let mut network = Network::new();
    network.add(Layer::fully_connected(2, 3));
    network.add(Layer::activation(ActivationFunction::Tanh));
    network.add(Layer::fully_connected(3, 1));
    network.add(Layer::activation(ActivationFunction::Tanh));
    network.use_loss(LossType::Mse);

    network.fit_with(&x_train, &y_train, epochs, learning_rate, |net| {
        if net.epoch() % 100 == 0 {
            info!(epoch = net.epoch(), error = net.error(), "xor");
        }
    })?;

    for (input, output) in x_train.iter().zip(network.predict(&x_train)?) {
        println!("Input: {:?} -> Output: {:.4}", input.data()[0], output.data()[0][0]);
    }
    Ok(())
}
