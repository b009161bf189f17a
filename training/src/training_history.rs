use crate::metrics::TrainingMetrics;
use std::collections::VecDeque;

/// Number of epochs a history keeps unless told otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Training history containing the metrics of the most recent epochs
#[derive(Debug, Clone)]
pub struct TrainingHistory {
    /// Metrics of the retained epochs, oldest first
    metrics: VecDeque<TrainingMetrics>,
    /// Maximum number of epochs retained
    capacity: usize,
    /// Best accuracy achieved during training, including evicted epochs
    pub best_accuracy: f64,
    /// Epoch where best accuracy was achieved
    pub best_epoch: usize,
}

impl Default for TrainingHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Creates a history retaining at most `capacity` epochs (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            metrics: VecDeque::with_capacity(capacity),
            capacity,
            best_accuracy: 0.0,
            best_epoch: 0,
        }
    }

    /// Appends an epoch, evicting the oldest one when full.
    pub fn record_epoch(&mut self, metrics: TrainingMetrics) {
        if self.metrics.len() == self.capacity {
            self.metrics.pop_front();
        }
        self.metrics.push_back(metrics);

        if metrics.accuracy > self.best_accuracy {
            self.best_accuracy = metrics.accuracy;
            self.best_epoch = metrics.epoch;
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn latest(&self) -> Option<&TrainingMetrics> {
        self.metrics.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingMetrics> {
        self.metrics.iter()
    }

    pub fn losses(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.loss).collect()
    }

    pub fn accuracies(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.accuracy).collect()
    }

    pub fn clear(&mut self) {
        self.metrics.clear();
        self.best_accuracy = 0.0;
        self.best_epoch = 0;
    }

    /// Prints a summary of the training history
    pub fn print_summary(&self) {
        println!("\nTraining History Summary:");
        println!("------------------------");
        println!(
            "Best accuracy: {:.2}% (epoch {})",
            self.best_accuracy * 100.0,
            self.best_epoch
        );
        if let Some(latest) = self.latest() {
            println!("Final accuracy: {:.2}%", latest.accuracy * 100.0);
            println!("Final loss: {:.4}", latest.loss);
        }

        // Print progression at 25% intervals of the retained window
        let len = self.metrics.len();
        if len >= 4 {
            println!("\nAccuracy progression:");
            for i in 0..=3 {
                if let Some(metrics) = self.metrics.get(i * (len - 1) / 3) {
                    println!(
                        "Epoch {}: {:.2}% (loss: {:.4})",
                        metrics.epoch,
                        metrics.accuracy * 100.0,
                        metrics.loss
                    );
                }
            }
        }
    }
}
