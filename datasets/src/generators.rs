//! Built-in two-dimensional toy problems.
//!
//! Every generator produces two inputs per point. XOR, circle and moon have a
//! single output; spiral is one-hot over two classes.

use crate::dataset::{DataPoint, Dataset};
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Number of points the random generators produce unless told otherwise.
pub const DEFAULT_POINTS: usize = 1000;

/// The built-in datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Xor,
    Circle,
    Spiral,
    Moon,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Xor,
        DatasetKind::Circle,
        DatasetKind::Spiral,
        DatasetKind::Moon,
    ];

    /// Generates the dataset with `points` samples (XOR always has four).
    pub fn generate<R: Rng>(self, points: usize, rng: &mut R) -> Dataset {
        match self {
            DatasetKind::Xor => xor(),
            DatasetKind::Circle => circle(points, rng),
            DatasetKind::Spiral => spiral(points, rng),
            DatasetKind::Moon => moon(points, rng),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DatasetKind::Xor => "xor",
            DatasetKind::Circle => "circle",
            DatasetKind::Spiral => "spiral",
            DatasetKind::Moon => "moon",
        };
        f.write_str(name)
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown dataset '{s}'"))
    }
}

/// The four points of the XOR truth table.
pub fn xor() -> Dataset {
    Dataset::new(
        "XOR Problem",
        "Learn the XOR logical operation",
        vec![
            DataPoint::new(vec![0.0, 0.0], vec![0.0]),
            DataPoint::new(vec![0.0, 1.0], vec![1.0]),
            DataPoint::new(vec![1.0, 0.0], vec![1.0]),
            DataPoint::new(vec![1.0, 1.0], vec![0.0]),
        ],
    )
}

/// Points drawn uniformly from `[-1, 1)²`, labelled `1` when they lie within
/// a radius of 0.5 around the origin.
pub fn circle<R: Rng>(points: usize, rng: &mut R) -> Dataset {
    let data = (0..points)
        .map(|_| {
            let x: f64 = rng.random_range(-1.0..1.0);
            let y: f64 = rng.random_range(-1.0..1.0);
            let inside = (x * x + y * y).sqrt() <= 0.5;
            DataPoint::new(vec![x, y], vec![if inside { 1.0 } else { 0.0 }])
        })
        .collect();

    Dataset::new(
        "Circle Classification",
        "Classify points inside/outside a circle",
        data,
    )
}

/// Two interleaved spirals, one-hot labelled `[1, 0]` and `[0, 1]`.
///
/// Each step emits one point of either arm. The arms advance in steps of
/// `1 / (points / 2)` of their length, and an odd `points` takes one extra
/// step, yielding one point more.
pub fn spiral<R: Rng>(points: usize, rng: &mut R) -> Dataset {
    let arm_points = points.div_ceil(2);
    let n = points as f64 / 2.0;
    let mut data = Vec::with_capacity(arm_points * 2);

    for i in 0..arm_points {
        let progress = i as f64 / n;
        let r = progress * 5.0;
        let t = 1.75 * progress * 2.0 * PI + rng.random_range(0.0..0.2);

        data.push(DataPoint::new(
            vec![r * t.sin(), r * t.cos()],
            vec![1.0, 0.0],
        ));
        data.push(DataPoint::new(
            vec![r * (t + PI).sin(), r * (t + PI).cos()],
            vec![0.0, 1.0],
        ));
    }

    Dataset::new(
        "Spiral Classification",
        "Classify points belonging to two interleaved spirals",
        data,
    )
}

/// Two crescent moons: the upper one labelled `1`, the lower, shifted one
/// labelled `0`. Each point picks its moon with equal probability.
pub fn moon<R: Rng>(points: usize, rng: &mut R) -> Dataset {
    let data = (0..points)
        .map(|_| {
            let t = rng.random_range(0.0..PI);
            let r = 1.0 + rng.random_range(0.0..0.2);

            if rng.random_bool(0.5) {
                DataPoint::new(vec![r * t.cos(), r * t.sin()], vec![1.0])
            } else {
                DataPoint::new(vec![-r * t.cos() + 1.0, -r * t.sin() + 0.5], vec![0.0])
            }
        })
        .collect();

    Dataset::new(
        "Moon Classification",
        "Classify points belonging to two crescent moon shapes",
        data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_xor() {
        let dataset = xor();
        assert_eq!(dataset.name, "XOR Problem");
        assert_eq!(dataset.len(), 4);
        for point in dataset.points() {
            let expected = if point.input[0] != point.input[1] { 1.0 } else { 0.0 };
            assert_eq!(point.output, vec![expected]);
        }
    }

    #[test]
    fn test_circle_labels_match_radius() {
        let dataset = circle(500, &mut StdRng::seed_from_u64(1));
        assert_eq!(dataset.len(), 500);
        assert_eq!(dataset.input_size(), Some(2));
        assert_eq!(dataset.output_size(), Some(1));

        for point in dataset.points() {
            let (x, y) = (point.input[0], point.input[1]);
            assert!((-1.0..1.0).contains(&x) && (-1.0..1.0).contains(&y));
            let inside = (x * x + y * y).sqrt() <= 0.5;
            assert_eq!(point.output[0], if inside { 1.0 } else { 0.0 });
        }
        // A circle of radius 0.5 covers roughly a fifth of the square
        let inside = dataset.points().iter().filter(|p| p.output[0] == 1.0).count();
        assert!(inside > 50 && inside < 150, "{inside} points inside");
    }

    #[test]
    fn test_spiral_arms_are_point_symmetric() {
        let dataset = spiral(200, &mut StdRng::seed_from_u64(2));
        assert_eq!(dataset.len(), 200);
        assert_eq!(dataset.output_size(), Some(2));

        for pair in dataset.points().chunks(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert_eq!(a.output, vec![1.0, 0.0]);
            assert_eq!(b.output, vec![0.0, 1.0]);
            // Rotating by pi mirrors the point through the origin
            assert_relative_eq!(a.input[0], -b.input[0], epsilon = 1e-9);
            assert_relative_eq!(a.input[1], -b.input[1], epsilon = 1e-9);
        }

    }

    #[test]
    fn test_spiral_with_odd_point_count() {
        let dataset = spiral(7, &mut StdRng::seed_from_u64(2));
        assert_eq!(dataset.len(), 8);

        // The radius grows in steps of 5 / 3.5
        let radius = |p: &DataPoint| p.input[0].hypot(p.input[1]);
        let last = &dataset.points()[6];
        assert_relative_eq!(radius(last), 3.0 / 3.5 * 5.0, epsilon = 1e-9);
        assert_relative_eq!(radius(&dataset.points()[0]), 0.0);
        assert!(spiral(0, &mut StdRng::seed_from_u64(2)).is_empty());
    }

    #[test]
    fn test_moon_points_lie_on_their_crescent() {
        let dataset = moon(400, &mut StdRng::seed_from_u64(3));
        assert_eq!(dataset.len(), 400);

        let mut upper = 0;
        for point in dataset.points() {
            let (x, y) = (point.input[0], point.input[1]);
            let r = if point.output[0] == 1.0 {
                upper += 1;
                assert!(y >= 0.0);
                (x * x + y * y).sqrt()
            } else {
                assert!(y <= 0.5);
                ((x - 1.0).powi(2) + (y - 0.5).powi(2)).sqrt()
            };
            assert!((1.0 - 1e-9..1.2 + 1e-9).contains(&r), "radius {r}");
        }
        assert!(upper > 100 && upper < 300, "{upper} upper points");
    }

    #[test]
    fn test_kind_parsing_and_generation() {
        let mut rng = StdRng::seed_from_u64(4);
        for kind in DatasetKind::ALL {
            let parsed: DatasetKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
            assert!(!kind.generate(20, &mut rng).is_empty());
        }
        assert_eq!("XOR".parse::<DatasetKind>().unwrap(), DatasetKind::Xor);
        assert!("mnist".parse::<DatasetKind>().is_err());
        assert_eq!(DatasetKind::Xor.generate(DEFAULT_POINTS, &mut rng).len(), 4);
    }
}
