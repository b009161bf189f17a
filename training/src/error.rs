use datasets::DatasetError;
use neural_network::NetworkError;
use thiserror::Error;

/// Errors surfaced by the training host
#[derive(Debug, Error)]
pub enum TrainingError {
    /// The network could not be built from the configuration
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// The dataset could not be loaded
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
