use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A neuron nonlinearity paired with its derivative.
///
/// The derivative is expressed in terms of the *activated* value rather than
/// the weighted sum, which is all the backward pass keeps around.
#[derive(Clone, Copy, Debug)]
pub struct Activation {
    pub function: fn(f64) -> f64,
    pub derivative: fn(f64) -> f64,
    activation_type: ActivationType,
}

/// The closed set of activations a network can be configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationType {
    #[default]
    Sigmoid,
    Relu,
    Tanh,
}

impl ActivationType {
    pub const ALL: [ActivationType; 3] = [
        ActivationType::Sigmoid,
        ActivationType::Relu,
        ActivationType::Tanh,
    ];

    /// Resolves the type to its function/derivative pair.
    pub fn activation(self) -> Activation {
        match self {
            ActivationType::Sigmoid => SIGMOID,
            ActivationType::Relu => RELU,
            ActivationType::Tanh => TANH,
        }
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ActivationType::Sigmoid => "sigmoid",
            ActivationType::Relu => "relu",
            ActivationType::Tanh => "tanh",
        };
        f.write_str(name)
    }
}

impl FromStr for ActivationType {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(ActivationType::Sigmoid),
            "relu" => Ok(ActivationType::Relu),
            "tanh" => Ok(ActivationType::Tanh),
            other => Err(NetworkError::InvalidConfig(format!(
                "unknown activation function '{other}'"
            ))),
        }
    }
}

impl Activation {
    pub fn activation_type(&self) -> ActivationType {
        self.activation_type
    }

    /// Maps a weighted input sum to the neuron's value.
    #[inline]
    pub fn apply(&self, sum: f64) -> f64 {
        (self.function)(sum)
    }

    /// Scales an error signal by the derivative at `value`.
    ///
    /// For relu this is `error` when the neuron fired and zero otherwise.
    #[inline]
    pub fn gradient(&self, error: f64, value: f64) -> f64 {
        error * (self.derivative)(value)
    }
}

pub const SIGMOID: Activation = Activation {
    function: |x| 1.0 / (1.0 + (-x).exp()),
    derivative: |y| y * (1.0 - y),
    activation_type: ActivationType::Sigmoid,
};

pub const RELU: Activation = Activation {
    function: |x| x.max(0.0),
    derivative: |y| if y > 0.0 { 1.0 } else { 0.0 },
    activation_type: ActivationType::Relu,
};

pub const TANH: Activation = Activation {
    function: f64::tanh,
    derivative: |y| 1.0 - y * y,
    activation_type: ActivationType::Tanh,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sigmoid() {
        assert_relative_eq!(SIGMOID.apply(0.0), 0.5);
        assert!(SIGMOID.apply(5.0) > 0.99);
        assert!(SIGMOID.apply(-5.0) < 0.01);
        // error * value * (1 - value)
        assert_relative_eq!(SIGMOID.gradient(0.5, 0.25), 0.5 * 0.25 * 0.75);
    }

    #[test]
    fn test_relu() {
        assert_eq!(RELU.apply(-2.0), 0.0);
        assert_eq!(RELU.apply(3.5), 3.5);
        assert_eq!(RELU.gradient(0.7, 1.2), 0.7);
        assert_eq!(RELU.gradient(0.7, 0.0), 0.0);
    }

    #[test]
    fn test_tanh() {
        assert_relative_eq!(TANH.apply(0.0), 0.0);
        assert_relative_eq!(TANH.apply(1.0), 1.0_f64.tanh());
        assert_relative_eq!(TANH.gradient(2.0, 0.5), 2.0 * (1.0 - 0.25));
    }

    #[test]
    fn test_activation_type_round_trips_through_name() {
        for activation_type in ActivationType::ALL {
            let parsed: ActivationType = activation_type.to_string().parse().unwrap();
            assert_eq!(parsed, activation_type);
            assert_eq!(parsed.activation().activation_type(), activation_type);
        }
        assert!("softmax".parse::<ActivationType>().is_err());
        assert_eq!("ReLU".parse::<ActivationType>().unwrap(), ActivationType::Relu);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ActivationType::Tanh).unwrap();
        assert_eq!(json, "\"tanh\"");
        let parsed: ActivationType = serde_json::from_str("\"relu\"").unwrap();
        assert_eq!(parsed, ActivationType::Relu);
    }
}
