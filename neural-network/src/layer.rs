//! Defines the neurons, connections and layers a network is made of.
//!
//! Neurons are stored in per-layer arenas and addressed by [`NeuronId`], a
//! `(layer, position)` pair. Connections are owned by their destination
//! neuron and refer to their source by id.
use rand::Rng;
use std::fmt;

/// Identity of a neuron: the index of its layer and its position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId {
    pub layer: usize,
    pub position: usize,
}

impl NeuronId {
    pub fn new(layer: usize, position: usize) -> Self {
        Self { layer, position }
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.layer, self.position)
    }
}

/// A weighted edge from a neuron in the previous layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: NeuronId,
    pub to: NeuronId,
    pub weight: f64,
    /// Source value times weight, as of the last forward pass.
    pub signal: f64,
    /// Downstream gradient times source value, as of the last backward pass.
    pub gradient: f64,
}

impl Connection {
    /// Creates a connection with a random weight in `[-1, 1)`.
    pub(crate) fn random<R: Rng>(from: NeuronId, to: NeuronId, rng: &mut R) -> Self {
        Self {
            from,
            to,
            weight: rng.random_range(-1.0..1.0),
            signal: 0.0,
            gradient: 0.0,
        }
    }
}

/// A single unit of the network together with its incoming connections.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub id: NeuronId,
    pub value: f64,
    pub bias: f64,
    pub gradient: f64,
    pub error: f64,
    pub(crate) connections: Vec<Connection>,
}

impl Neuron {
    /// Creates an unconnected neuron with a random value in `[0, 1)` and a
    /// random bias in `[-1, 1)`.
    pub(crate) fn random<R: Rng>(id: NeuronId, rng: &mut R) -> Self {
        Self {
            id,
            value: rng.random_range(0.0..1.0),
            bias: rng.random_range(-1.0..1.0),
            gradient: 0.0,
            error: 0.0,
            connections: Vec::new(),
        }
    }

    /// Incoming connections, in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }
}

/// Represents a single layer in the neural network.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub(crate) index: usize,
    pub(crate) neurons: Vec<Neuron>,
}

impl Layer {
    /// Creates a layer of `size` unconnected random neurons.
    pub(crate) fn random<R: Rng>(index: usize, size: usize, rng: &mut R) -> Self {
        let neurons = (0..size)
            .map(|position| Neuron::random(NeuronId::new(index, position), rng))
            .collect();
        Self { index, neurons }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Current activation of every neuron, in layer order.
    pub fn values(&self) -> Vec<f64> {
        self.neurons.iter().map(|neuron| neuron.value).collect()
    }

    /// Number of connections materialized into this layer.
    pub fn connection_count(&self) -> usize {
        self.neurons.iter().map(|neuron| neuron.connections.len()).sum()
    }

    /// Wires one fresh connection from every neuron of `previous` into every
    /// neuron of this layer.
    pub(crate) fn connect_from<R: Rng>(&mut self, previous: &Layer, rng: &mut R) {
        for neuron in &mut self.neurons {
            for source in &previous.neurons {
                neuron
                    .connections
                    .push(Connection::random(source.id, neuron.id, rng));
            }
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{ index: {}, neurons: {}, connections: {} }}",
            self.index,
            self.neurons.len(),
            self.connection_count()
        )
    }
}
