// Modules
mod activations;
mod error;
mod layer;
mod network;
mod network_config;

pub use activations::{Activation, ActivationType, RELU, SIGMOID, TANH};
pub use error::{NetworkError, Result};
pub use layer::{Connection, Layer, Neuron, NeuronId};
pub use network::Network;
pub use network_config::{NetworkConfig, NetworkConfigBuilder, NetworkConfigBuilderError};
