//! Training module for the playground.
//!
//! This module provides the training loop, in two layers:
//! - [`train_epoch`] runs exactly one epoch of online learning on a network
//! - [`Trainer`] is the host side: it owns the configuration, the network,
//!   the selected dataset, the "is training" flag and a bounded metrics
//!   history, and advances training one epoch per [`Trainer::tick`]
//!
//! Nothing here blocks or spawns threads. A driver calls `tick` once per
//! frame (or loop iteration) and may read the network in between; clearing
//! the training flag stops the next tick from doing any work.

use crate::error::TrainingError;
use crate::metrics::TrainingMetrics;
use crate::training_history::TrainingHistory;
use datasets::{DataPoint, Dataset};
use log::{debug, trace, warn};
use neural_network::{Network, NetworkConfig, NeuronId};
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use std::path::Path;

/// Trains `network` for one epoch on a random batch of `dataset`.
///
/// Up to `config.batch_size` distinct samples are drawn uniformly at random.
/// Each one is fed forward and immediately backpropagated, so the batch
/// applies one update per sample. Loss and accuracy are taken from the
/// predictions made before each sample's update.
///
/// The returned metrics carry `config.epoch` as it was on entry; the counter
/// is then advanced by exactly one, even when the dataset is empty.
pub fn train_epoch<R: Rng>(
    network: &mut Network,
    dataset: &Dataset,
    config: &mut NetworkConfig,
    rng: &mut R,
) -> TrainingMetrics {
    let mut samples: Vec<&DataPoint> = dataset.points().iter().collect();
    let batch_size = config.batch_size.min(samples.len());
    let (batch, _) = samples.partial_shuffle(rng, batch_size);

    let mut total_loss = 0.0;
    let mut correct = 0;
    for sample in batch.iter() {
        let prediction = network.forward(Some(sample.input.as_slice()), config.activation);
        network.backward(&sample.output, config.activation, config.learning_rate);

        total_loss += calculate_loss(&prediction, &sample.output);
        if is_correct(&prediction, &sample.output) {
            correct += 1;
        }
    }

    let metrics = TrainingMetrics::from_totals(config.epoch, total_loss, correct, batch.len());
    config.epoch += 1;
    trace!("{metrics}");
    metrics
}

/// Mean squared error over the target's components. Missing predictions
/// count as zero.
fn calculate_loss(prediction: &[f64], target: &[f64]) -> f64 {
    if target.is_empty() {
        return 0.0;
    }
    let sum_squared_error: f64 = target
        .iter()
        .enumerate()
        .map(|(i, t)| (t - prediction.get(i).copied().unwrap_or(0.0)).powi(2))
        .sum();
    sum_squared_error / target.len() as f64
}

/// A prediction is correct when its first component is within 0.5 of the
/// target's.
fn is_correct(prediction: &[f64], target: &[f64]) -> bool {
    match (prediction.first(), target.first()) {
        (Some(p), Some(t)) => (p - t).abs() < 0.5,
        _ => false,
    }
}

/// Trainer manages the interactive training session.
///
/// The trainer handles:
/// - Network (re)initialization when the architecture changes
/// - Structural edits and manual forward passes
/// - One epoch per scheduling tick while training is switched on
/// - Metrics history
pub struct Trainer<R: Rng = ThreadRng> {
    config: NetworkConfig,
    network: Network,
    dataset: Option<Dataset>,
    history: TrainingHistory,
    is_training: bool,
    rng: R,
}

impl Trainer<ThreadRng> {
    /// Creates a trainer with a freshly built network for `config`.
    ///
    /// # Errors
    /// Returns `TrainingError::Network` if the configuration is invalid.
    pub fn new(config: NetworkConfig) -> Result<Self, TrainingError> {
        Self::with_rng(config, rand::rng())
    }
}

impl<R: Rng> Trainer<R> {
    /// Creates a trainer drawing every random number from `rng`.
    pub fn with_rng(config: NetworkConfig, mut rng: R) -> Result<Self, TrainingError> {
        config.validate()?;
        let network = Network::with_rng(&config.layers, &mut rng)?;

        Ok(Self {
            config,
            network,
            dataset: None,
            history: TrainingHistory::new(),
            is_training: false,
            rng,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Returns the history of the most recent epochs
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    pub fn is_training(&self) -> bool {
        self.is_training
    }

    /// Applies `edit` to a copy of the configuration and adopts it if it
    /// validates.
    ///
    /// The network is rebuilt from scratch when the layer sizes changed;
    /// every other field takes effect from the next epoch on. Returns whether
    /// a rebuild happened.
    ///
    /// # Errors
    /// Returns `TrainingError::Network` and keeps the current configuration
    /// if the edited one is invalid.
    pub fn update_config<F>(&mut self, edit: F) -> Result<bool, TrainingError>
    where
        F: FnOnce(&mut NetworkConfig),
    {
        let mut config = self.config.clone();
        edit(&mut config);
        if let Err(e) = config.validate() {
            warn!("rejected configuration update: {e}");
            return Err(e.into());
        }

        let rebuild = config.layers != self.config.layers;
        if rebuild {
            self.network = Network::with_rng(&config.layers, &mut self.rng)?;
            debug!("architecture changed to {:?}, network rebuilt", config.layers);
        }
        self.config = config;
        Ok(rebuild)
    }

    /// Replaces the network with a freshly initialized one of the same
    /// configured architecture, dropping any neurons added since.
    pub fn reset(&mut self) -> Result<(), TrainingError> {
        self.network = Network::with_rng(&self.config.layers, &mut self.rng)?;
        debug!("network reinitialized");
        Ok(())
    }

    /// Appends a neuron to a hidden layer; see [`Network::add_neuron`].
    pub fn add_neuron(&mut self, layer_index: usize) -> Option<NeuronId> {
        self.network
            .add_neuron_with_rng(layer_index, &mut self.rng)
            .map(|neuron| neuron.id)
    }

    /// Runs a forward pass on whatever the input layer currently holds.
    pub fn forward_pass(&mut self) -> Vec<f64> {
        self.network.forward(None, self.config.activation)
    }

    /// Runs a forward pass on `input` and returns the prediction.
    pub fn predict(&mut self, input: &[f64]) -> Vec<f64> {
        self.network.forward(Some(input), self.config.activation)
    }

    /// Selects the dataset subsequent epochs are drawn from.
    pub fn select_dataset(&mut self, dataset: Dataset) {
        let widths = (dataset.input_size(), dataset.output_size());
        if widths != (Some(self.network.input_size()), Some(self.network.output_size())) {
            warn!(
                "dataset '{}' has shape {:?}, network expects {} -> {}",
                dataset.name,
                widths,
                self.network.input_size(),
                self.network.output_size()
            );
        }
        debug!("selected dataset '{}' ({} points)", dataset.name, dataset.len());
        self.dataset = Some(dataset);
    }

    /// Loads a dataset from a JSON file and selects it.
    pub fn load_dataset(&mut self, path: &Path) -> Result<(), TrainingError> {
        let dataset = Dataset::load(path)?;
        self.select_dataset(dataset);
        Ok(())
    }

    pub fn start(&mut self) {
        self.is_training = true;
    }

    pub fn stop(&mut self) {
        self.is_training = false;
    }

    /// Flips the training flag and returns its new value.
    pub fn toggle_training(&mut self) -> bool {
        self.is_training = !self.is_training;
        self.is_training
    }

    /// One cooperative scheduling step.
    ///
    /// Trains exactly one epoch when training is switched on and a dataset
    /// is selected, and does nothing otherwise.
    pub fn tick(&mut self) -> Option<TrainingMetrics> {
        if !self.is_training {
            return None;
        }
        self.train_epoch()
    }

    /// Trains one epoch on the selected dataset regardless of the training
    /// flag and records it in the history. Returns `None` without a dataset.
    pub fn train_epoch(&mut self) -> Option<TrainingMetrics> {
        let dataset = self.dataset.as_ref()?;
        let metrics = train_epoch(&mut self.network, dataset, &mut self.config, &mut self.rng);
        self.history.record_epoch(metrics);
        Some(metrics)
    }
}
