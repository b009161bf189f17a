use anyhow::{Context, Result, bail};
use clap::Parser;
use datasets::{DEFAULT_POINTS, Dataset, DatasetKind};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use neural_network::{ActivationType, NetworkConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;
use training::{Trainer, TrainingHistory};

/// Number of samples whose predictions are printed after training
const SHOWN_PREDICTIONS: usize = 4;

/// Train a small fully connected network on a toy dataset, one epoch per tick.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON network configuration; individual flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in dataset: xor, circle, spiral or moon
    #[arg(short, long, default_value_t = DatasetKind::Xor)]
    dataset: DatasetKind,

    /// JSON dataset file, used instead of a built-in dataset
    #[arg(long)]
    dataset_file: Option<PathBuf>,

    /// Number of points generated for the random datasets
    #[arg(long, default_value_t = DEFAULT_POINTS)]
    points: usize,

    /// Layer sizes, input first, e.g. 2,4,3,1
    #[arg(short, long, value_delimiter = ',')]
    layers: Option<Vec<usize>>,

    /// Activation function: sigmoid, relu or tanh
    #[arg(short, long)]
    activation: Option<ActivationType>,

    #[arg(long)]
    learning_rate: Option<f64>,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long)]
    momentum: Option<f64>,

    /// Hidden layer to grow by one neuron before training; may be repeated
    #[arg(long = "add-neuron")]
    add_neuron: Vec<usize>,

    /// Maximum number of epochs to train
    #[arg(short, long, default_value_t = 1000)]
    epochs: usize,

    /// Stop as soon as an epoch's loss drops below this value
    #[arg(long)]
    target_loss: Option<f64>,

    /// Seed for weight initialization, sampling and dataset generation
    #[arg(long)]
    seed: Option<u64>,

    /// Print every epoch's metrics as a JSON line
    #[arg(long)]
    json: bool,
}

/// Builds the network configuration from the optional file and the flags.
fn build_config(args: &Args) -> Result<NetworkConfig> {
    let mut config = match &args.config {
        Some(path) => NetworkConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => NetworkConfig::default(),
    };

    if let Some(layers) = &args.layers {
        config.layers = layers.clone();
    }
    if let Some(activation) = args.activation {
        config.activation = activation;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(momentum) = args.momentum {
        config.momentum = momentum;
    }

    config.validate().context("Invalid network configuration")?;
    Ok(config)
}

fn load_dataset(args: &Args, rng: &mut StdRng) -> Result<Dataset> {
    match &args.dataset_file {
        Some(path) => Dataset::load(path)
            .with_context(|| format!("Failed to load dataset from {}", path.display())),
        None => Ok(args.dataset.generate(args.points, rng)),
    }
}

/// Matches the input and output layer to the dataset unless the layers
/// were given explicitly on the command line.
fn fit_to_dataset(config: &mut NetworkConfig, dataset: &Dataset, explicit_layers: bool) {
    let (Some(inputs), Some(outputs)) = (dataset.input_size(), dataset.output_size()) else {
        return;
    };
    if inputs == config.input_size() && outputs == config.output_size() {
        return;
    }
    if explicit_layers {
        warn!(
            "dataset '{}' maps {inputs} -> {outputs} values but the network maps {} -> {}",
            dataset.name,
            config.input_size(),
            config.output_size()
        );
        return;
    }

    if let Some(first) = config.layers.first_mut() {
        *first = inputs;
    }
    if let Some(last) = config.layers.last_mut() {
        *last = outputs;
    }
    info!("adapted layers to dataset '{}': {:?}", dataset.name, config.layers);
}

fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .context("Failed to set progress bar template")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

fn run(args: &Args) -> Result<TrainingHistory> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut config = build_config(args)?;
    let dataset = load_dataset(args, &mut rng)?;
    if dataset.is_empty() {
        bail!("Dataset '{}' has no points", dataset.name);
    }
    fit_to_dataset(&mut config, &dataset, args.layers.is_some());

    println!(
        "Training {:?} ({}) on '{}' ({} points)",
        config.layers,
        config.activation,
        dataset.name,
        dataset.len()
    );

    let mut trainer = Trainer::with_rng(config, rng).context("Failed to create network")?;
    for &layer in &args.add_neuron {
        match trainer.add_neuron(layer) {
            Some(id) => info!("added neuron {id}"),
            None => warn!("layer {layer} is not a hidden layer, no neuron added"),
        }
    }
    if !args.add_neuron.is_empty() {
        println!("Grown architecture: {:?}", trainer.network().layer_sizes());
    }

    trainer.select_dataset(dataset);
    let progress = create_progress_bar(args.epochs as u64)?;
    let start_time = Instant::now();

    let mut trained = 0;
    if args.epochs > 0 {
        trainer.start();
    }
    while trainer.is_training() {
        let Some(metrics) = trainer.tick() else {
            break;
        };
        trained += 1;

        if args.json {
            progress.println(serde_json::to_string(&metrics)?);
        }
        progress.set_message(format!(
            "Loss: {:.4}, Accuracy: {:.1}%",
            metrics.loss,
            metrics.accuracy * 100.0
        ));
        progress.inc(1);

        let reached_target = args.target_loss.is_some_and(|target| metrics.loss < target);
        if reached_target || trained >= args.epochs {
            trainer.stop();
        }
    }
    progress.finish_with_message("Training completed!");

    println!(
        "Trained {trained} epochs in {:.2?}",
        start_time.elapsed()
    );
    trainer.history().print_summary();

    let samples: Vec<_> = trainer
        .dataset()
        .map(|dataset| dataset.points().iter().take(SHOWN_PREDICTIONS).cloned().collect())
        .unwrap_or_default();
    if !samples.is_empty() {
        println!("\nPredictions:");
    }
    for point in samples {
        let prediction = trainer.predict(&point.input);
        println!(
            "{:?} -> {:?} (expected {:?})",
            point.input, prediction, point.output
        );
    }

    Ok(trainer.history().clone())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "layers": [2, 8, 1], "activation": "relu", "learningRate": 0.3 }"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "playground",
            "--config",
            path.to_str().unwrap(),
            "--activation",
            "tanh",
            "--batch-size",
            "8",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.layers, vec![2, 8, 1]);
        assert_eq!(config.activation, ActivationType::Tanh);
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.batch_size, 8);
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let args = Args::parse_from(["playground", "--layers", "2", "--epochs", "1"]);
        assert!(build_config(&args).is_err());
        assert!(Args::try_parse_from(["playground", "--activation", "softmax"]).is_err());
        assert!(Args::try_parse_from(["playground", "--dataset", "mnist"]).is_err());
    }

    #[test]
    fn test_fit_to_dataset() {
        let spiral = datasets::spiral(10, &mut StdRng::seed_from_u64(0));

        let mut config = NetworkConfig::default();
        fit_to_dataset(&mut config, &spiral, false);
        assert_eq!(config.layers, vec![2, 4, 3, 2]);

        let mut explicit = NetworkConfig::default();
        fit_to_dataset(&mut explicit, &spiral, true);
        assert_eq!(explicit.layers, vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_end_to_end() {
        let args = Args::parse_from([
            "playground",
            "--dataset",
            "circle",
            "--points",
            "50",
            "--epochs",
            "5",
            "--add-neuron",
            "1",
            "--add-neuron",
            "0",
            "--seed",
            "1",
        ]);
        let history = run(&args).unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history.latest().map(|m| m.epoch), Some(4));
    }

    #[test]
    fn test_target_loss_stops_training_early() {
        let args = Args::parse_from([
            "playground",
            "--epochs",
            "50",
            "--target-loss",
            "10.0",
            "--seed",
            "2",
        ]);
        let history = run(&args).unwrap();
        assert_eq!(history.len(), 1);
    }
}
