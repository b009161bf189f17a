pub mod dataset;
pub mod generators;

pub use crate::dataset::*;
pub use crate::generators::{DEFAULT_POINTS, DatasetKind, circle, moon, spiral, xor};
