mod error;
mod metrics;
mod training;
mod training_history;

pub use error::TrainingError;
pub use metrics::{TrainingMetrics, VALIDATION_ACCURACY_FACTOR, VALIDATION_LOSS_FACTOR};
pub use training::{Trainer, train_epoch};
pub use training_history::{DEFAULT_HISTORY_CAPACITY, TrainingHistory};

pub mod prelude {
    pub use crate::Trainer;
    pub use crate::TrainingHistory;
    pub use crate::TrainingMetrics;
    pub use crate::train_epoch;
}
