use crate::activations::ActivationType;
use crate::error::Result;
use crate::layer::{Connection, Layer, Neuron, NeuronId};
use crate::network_config::{NetworkConfig, validate_layers};
use log::{debug, warn};
use rand::Rng;

/// A fully connected feedforward network stored as a stack of neuron arenas.
///
/// Every neuron of layer `i > 0` owns exactly one incoming [`Connection`] per
/// neuron of layer `i - 1`; the input layer owns none. The network only ever
/// grows (see [`Network::add_neuron`]) or is replaced wholesale by building a
/// new one, so a `NeuronId` handed out once stays valid for its lifetime.
///
/// Propagation resolves connection sources through [`Network::lookup`]. A
/// source that does not resolve contributes nothing: it is skipped in the
/// weighted sum, in the error accumulation and in the weight update, and is
/// never reported as an error.
///
/// # Examples
///
/// ```
/// use neural_network::{Network, NetworkConfig};
///
/// let config = NetworkConfig::default();
/// let mut network = Network::new(&config).unwrap();
///
/// // One step of online learning on the XOR sample [0, 1] -> [1]
/// let input = [0.0, 1.0];
/// let before = network.forward(Some(&input[..]), config.activation);
/// network.backward(&[1.0], config.activation, config.learning_rate);
/// let after = network.forward(Some(&input[..]), config.activation);
/// assert!((1.0 - after[0]).abs() < (1.0 - before[0]).abs());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a randomly initialized network for `config.layers`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidConfig`](crate::NetworkError::InvalidConfig)
    /// if fewer than two layer sizes are given or any size is zero.
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        Self::with_rng(&config.layers, &mut rand::rng())
    }

    /// Builds a randomly initialized network drawing from `rng`.
    ///
    /// Neuron values are drawn from `[0, 1)`, biases and weights from
    /// `[-1, 1)`. Signals and gradients start at zero.
    pub fn with_rng<R: Rng>(layer_sizes: &[usize], rng: &mut R) -> Result<Self> {
        validate_layers(layer_sizes)?;

        let mut layers: Vec<Layer> = Vec::with_capacity(layer_sizes.len());
        for (index, &size) in layer_sizes.iter().enumerate() {
            let mut layer = Layer::random(index, size, rng);
            if let Some(previous) = layers.last() {
                layer.connect_from(previous, rng);
            }
            layers.push(layer);
        }

        let network = Self { layers };
        debug!(
            "built network {:?} with {} connections",
            network.layer_sizes(),
            network.connection_count()
        );
        Ok(network)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Number of neurons in each layer, input first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::len).collect()
    }

    pub fn connection_count(&self) -> usize {
        self.layers.iter().map(Layer::connection_count).sum()
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::len)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::len)
    }

    /// Current values of the output layer, in layer order.
    pub fn output(&self) -> Vec<f64> {
        self.layers.last().map(Layer::values).unwrap_or_default()
    }

    /// Resolves a neuron identity to its current state.
    pub fn lookup(&self, id: NeuronId) -> Option<&Neuron> {
        find(&self.layers, id)
    }

    /// Appends a neuron to the hidden layer `layer_index`.
    ///
    /// See [`Network::add_neuron_with_rng`].
    pub fn add_neuron(&mut self, layer_index: usize) -> Option<&Neuron> {
        self.add_neuron_with_rng(layer_index, &mut rand::rng())
    }

    /// Appends a neuron to the hidden layer `layer_index`, wiring it to every
    /// neuron of the previous layer and from it to every neuron of the next
    /// layer with fresh random weights.
    ///
    /// The input layer, the output layer and out of range indices are left
    /// untouched and `None` is returned.
    pub fn add_neuron_with_rng<R: Rng>(
        &mut self,
        layer_index: usize,
        rng: &mut R,
    ) -> Option<&Neuron> {
        let output_index = self.layers.len().saturating_sub(1);
        if layer_index == 0 || layer_index >= output_index {
            warn!("ignoring add_neuron on non-hidden layer {layer_index}");
            return None;
        }

        let (before, after) = self.layers.split_at_mut(layer_index);
        let previous = before.last()?;
        let (current, rest) = after.split_first_mut()?;

        let id = NeuronId::new(layer_index, current.neurons.len());
        let mut neuron = Neuron::random(id, rng);
        for source in &previous.neurons {
            neuron
                .connections
                .push(Connection::random(source.id, id, rng));
        }
        if let Some(next) = rest.first_mut() {
            for target in &mut next.neurons {
                target
                    .connections
                    .push(Connection::random(id, target.id, rng));
            }
        }
        current.neurons.push(neuron);

        debug!(
            "added neuron {id}, layer {layer_index} now has {} neurons",
            current.neurons.len()
        );
        current.neurons.last()
    }

    /// Performs forward propagation and returns the output layer's values.
    ///
    /// When `input` is given it is copied into the input layer first; missing
    /// elements become `0.0` and extra elements are ignored. Without an input
    /// the input layer keeps whatever values it already holds.
    ///
    /// Every connection records its `signal` (source value times weight) on
    /// the way through.
    pub fn forward(&mut self, input: Option<&[f64]>, activation: ActivationType) -> Vec<f64> {
        let activation = activation.activation();

        if let (Some(input), Some(input_layer)) = (input, self.layers.first_mut()) {
            for (position, neuron) in input_layer.neurons.iter_mut().enumerate() {
                neuron.value = input.get(position).copied().unwrap_or(0.0);
            }
        }

        for index in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(index);
            let Some(layer) = after.first_mut() else {
                break;
            };

            for neuron in &mut layer.neurons {
                let mut sum = neuron.bias;
                for connection in &mut neuron.connections {
                    if let Some(source) = find(before, connection.from) {
                        connection.signal = source.value * connection.weight;
                        sum += connection.signal;
                    }
                }
                neuron.value = activation.apply(sum);
            }
        }

        self.output()
    }

    /// Performs backpropagation towards `target` and updates weights and
    /// biases.
    ///
    /// This should be called after [`Network::forward`] so the neuron values
    /// reflect the sample being learned. All errors and gradients are
    /// computed before any parameter changes, so the update sees a single
    /// consistent snapshot.
    ///
    /// Missing target elements are treated as `0.0`.
    pub fn backward(&mut self, target: &[f64], activation: ActivationType, learning_rate: f64) {
        self.compute_gradients(target, activation);
        self.apply_gradients(learning_rate);
    }

    fn compute_gradients(&mut self, target: &[f64], activation: ActivationType) {
        let activation = activation.activation();

        let Some(output_layer) = self.layers.last_mut() else {
            return;
        };
        for (position, neuron) in output_layer.neurons.iter_mut().enumerate() {
            let error = target.get(position).copied().unwrap_or(0.0) - neuron.value;
            neuron.error = error;
            neuron.gradient = activation.gradient(error, neuron.value);
        }

        // Layer 0 takes part so the connections into layer 1 get their
        // gradients; the input neurons' own error and gradient are only
        // informative.
        for index in (0..self.layers.len().saturating_sub(1)).rev() {
            let (before, after) = self.layers.split_at_mut(index + 1);
            let (Some(layer), Some(next)) = (before.last_mut(), after.first_mut()) else {
                continue;
            };

            let mut errors = vec![0.0; layer.neurons.len()];
            for next_neuron in &mut next.neurons {
                let downstream = next_neuron.gradient;
                for connection in &mut next_neuron.connections {
                    if connection.from.layer != index {
                        continue;
                    }
                    let position = connection.from.position;
                    if let (Some(error), Some(source)) =
                        (errors.get_mut(position), layer.neurons.get(position))
                    {
                        *error += downstream * connection.weight;
                        connection.gradient = downstream * source.value;
                    }
                }
            }

            for (neuron, error) in layer.neurons.iter_mut().zip(errors) {
                neuron.error = error;
                neuron.gradient = activation.gradient(error, neuron.value);
            }
        }
    }

    fn apply_gradients(&mut self, learning_rate: f64) {
        for index in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(index);
            let Some(layer) = after.first_mut() else {
                break;
            };

            for neuron in &mut layer.neurons {
                neuron.bias += learning_rate * neuron.gradient;
                for connection in &mut neuron.connections {
                    if find(before, connection.from).is_some() {
                        connection.weight += learning_rate * connection.gradient;
                    }
                }
            }
        }
    }
}

fn find(layers: &[Layer], id: NeuronId) -> Option<&Neuron> {
    layers.get(id.layer)?.neurons.get(id.position)
}
