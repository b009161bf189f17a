use crate::activations::ActivationType;
use crate::error::{NetworkError, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a neural network.
///
/// This struct holds everything the host needs to build and train a network:
/// the layer sizes, the activation function shared by every non-input layer
/// and the training hyperparameters.
///
/// # Example
///
/// ```
/// use neural_network::NetworkConfig;
///
/// let config = NetworkConfig::default();
/// assert_eq!(config.layers, vec![2, 4, 3, 1]); // two inputs, one output
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Builder)]
#[serde(rename_all = "camelCase", default)]
#[builder(default)]
pub struct NetworkConfig {
    /// Sizes of each layer in the network, including input and output layers.
    /// For example, `[2, 4, 1]` represents a network with:
    /// - 2 input neurons
    /// - 4 hidden neurons
    /// - 1 output neuron
    pub layers: Vec<usize>,

    /// Learning rate applied to every weight and bias update.
    pub learning_rate: f64,

    /// Activation applied by every non-input layer.
    pub activation: ActivationType,

    /// Epoch counter, advanced by one for each trained epoch.
    pub epoch: usize,

    /// Maximum number of samples drawn from the dataset per epoch.
    pub batch_size: usize,

    /// Momentum coefficient in `[0, 1]`.
    ///
    /// Carried for the host's benefit; the update rule does not use it.
    pub momentum: f64,
}

impl NetworkConfig {
    /// Loads a network configuration from a JSON file.
    ///
    /// Missing keys take their value from [`NetworkConfig::default`], and the
    /// result is validated before it is returned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use neural_network::NetworkConfig;
    /// use std::path::Path;
    ///
    /// let config = NetworkConfig::load(Path::new("config.json")).unwrap();
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config: NetworkConfig = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        validate_layers(&self.layers)?;

        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(NetworkError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.momentum) {
            return Err(NetworkError::InvalidConfig(format!(
                "momentum must be within [0, 1], got {}",
                self.momentum
            )));
        }

        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().copied().unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().copied().unwrap_or(0)
    }
}

/// Checks that `layers` describes at least an input and an output layer and
/// that no layer is empty.
pub(crate) fn validate_layers(layers: &[usize]) -> Result<()> {
    if layers.len() < 2 {
        return Err(NetworkError::InvalidConfig(format!(
            "expected at least 2 layer sizes, got {}",
            layers.len()
        )));
    }
    if let Some(index) = layers.iter().position(|&size| size == 0) {
        return Err(NetworkError::InvalidConfig(format!(
            "layer {index} must contain at least one neuron"
        )));
    }
    Ok(())
}

/// Default configuration of the playground:
/// - 2 inputs, hidden layers of 4 and 3 neurons, 1 output
/// - Sigmoid activation
/// - Learning rate: 0.1
/// - Batch size: 32
/// - Momentum: 0.9
impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layers: vec![2, 4, 3, 1],
            learning_rate: 0.1,
            activation: ActivationType::Sigmoid,
            epoch: 0,
            batch_size: 32,
            momentum: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("test_config.json");

        let config_json = r#"{
            "layers": [2, 8, 1],
            "learningRate": 0.05,
            "activation": "tanh",
            "epoch": 3,
            "batchSize": 16,
            "momentum": 0.5
        }"#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_json.as_bytes()).unwrap();

        let config = NetworkConfig::load(&config_path).unwrap();
        assert_eq!(config.layers, vec![2, 8, 1]);
        assert_eq!(config.activation, ActivationType::Tanh);
        assert_eq!(config.learning_rate, 0.05);
        assert_eq!(config.epoch, 3);
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.momentum, 0.5);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("partial.json");
        std::fs::write(&config_path, r#"{ "layers": [3, 2], "activation": "relu" }"#).unwrap();

        let config = NetworkConfig::load(&config_path).unwrap();
        assert_eq!(config.layers, vec![3, 2]);
        assert_eq!(config.activation, ActivationType::Relu);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("invalid.json");
        std::fs::write(&config_path, r#"{ "layers": [2] }"#).unwrap();

        let result = NetworkConfig::load(&config_path);
        assert!(matches!(result, Err(NetworkError::InvalidConfig(_))));

        let missing = NetworkConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(NetworkError::Io(_))));
    }

    #[test]
    fn test_default_config() {
        let config = NetworkConfig::default();
        assert_eq!(config.layers, vec![2, 4, 3, 1]);
        assert_eq!(config.activation, ActivationType::Sigmoid);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.momentum, 0.9);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.epoch, 0);
        assert_eq!(config.input_size(), 2);
        assert_eq!(config.output_size(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_fills_missing_fields_from_default() {
        let config = NetworkConfigBuilder::default()
            .layers(vec![2, 5, 2])
            .activation(ActivationType::Relu)
            .build()
            .unwrap();

        assert_eq!(config.layers, vec![2, 5, 2]);
        assert_eq!(config.activation, ActivationType::Relu);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_validate() {
        let valid = NetworkConfig::default();

        let too_short = NetworkConfig {
            layers: vec![4],
            ..valid.clone()
        };
        assert!(too_short.validate().is_err());

        let empty_layer = NetworkConfig {
            layers: vec![2, 0, 1],
            ..valid.clone()
        };
        assert!(empty_layer.validate().is_err());

        let bad_rate = NetworkConfig {
            learning_rate: 0.0,
            ..valid.clone()
        };
        assert!(bad_rate.validate().is_err());

        let bad_batch = NetworkConfig {
            batch_size: 0,
            ..valid.clone()
        };
        assert!(bad_batch.validate().is_err());

        let bad_momentum = NetworkConfig {
            momentum: 1.5,
            ..valid
        };
        assert!(bad_momentum.validate().is_err());
    }
}
