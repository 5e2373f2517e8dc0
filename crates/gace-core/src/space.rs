//! Observation and action space descriptors.
//!
//! A [`BoxSpace`] is an ordered list of bounded, named [`Dimension`]s.
//! Action dimensions carry the [`ParameterKind`] they control, which is how
//! consumers tell an electrical action space from a geometrical one without
//! knowing the concrete environment.

use std::fmt;

use rand::{Rng, RngExt};

use crate::id::Variant;

/// A circuit design parameter controlled by one action dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Transconductance efficiency gm/Id (S/A).
    GmOverId,
    /// Transit (unity current gain) frequency fug (Hz).
    TransitFrequency,
    /// Transistor width (m).
    Width,
    /// Transistor length (m).
    Length,
    /// Transistor multiplicity (number of parallel fingers).
    Multiplicity,
}

impl ParameterKind {
    /// The action-space variant this parameter belongs to.
    pub const fn variant(self) -> Variant {
        match self {
            Self::GmOverId | Self::TransitFrequency => Variant::Electrical,
            Self::Width | Self::Length | Self::Multiplicity => Variant::Geometrical,
        }
    }

    /// Short symbol used in dimension names (`"gmid"`, `"fug"`, `"W"`, ...).
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::GmOverId => "gmid",
            Self::TransitFrequency => "fug",
            Self::Width => "W",
            Self::Length => "L",
            Self::Multiplicity => "M",
        }
    }
}

/// What a dimension of a space represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimensionKind {
    /// A design parameter (action spaces, and the echoed action in
    /// observations).
    Parameter(ParameterKind),
    /// A simulated performance value.
    Performance,
    /// A performance target.
    Target,
    /// Relative distance between performance and target.
    Distance,
}

/// One named, bounded dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct Dimension {
    /// Human-readable name, e.g. `"MND1:gmid"` or `"a0"`.
    pub name: String,
    /// What the value represents.
    pub kind: DimensionKind,
    /// Inclusive lower bound. May be `-inf`.
    pub low: f32,
    /// Inclusive upper bound. May be `+inf`.
    pub high: f32,
}

impl Dimension {
    /// Create a dimension.
    pub fn new(name: impl Into<String>, kind: DimensionKind, low: f32, high: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            low,
            high,
        }
    }

    /// Whether both bounds are finite.
    pub fn is_bounded(&self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }
}

/// Errors from [`BoxSpace::new`].
#[derive(Clone, Debug, PartialEq)]
pub enum SpaceError {
    /// A dimension has a NaN bound or `low > high`.
    InvalidBounds {
        /// Name of the offending dimension.
        name: String,
        /// The configured lower bound.
        low: f32,
        /// The configured upper bound.
        high: f32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { name, low, high } => {
                write!(f, "dimension '{name}' has invalid bounds [{low}, {high}]")
            }
        }
    }
}

impl std::error::Error for SpaceError {}

/// A box-shaped space: the Cartesian product of per-dimension intervals.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    dims: Vec<Dimension>,
}

impl BoxSpace {
    /// Create a space from its dimensions, validating bounds.
    pub fn new(dims: Vec<Dimension>) -> Result<Self, SpaceError> {
        for d in &dims {
            if d.low.is_nan() || d.high.is_nan() || d.low > d.high {
                return Err(SpaceError::InvalidBounds {
                    name: d.name.clone(),
                    low: d.low,
                    high: d.high,
                });
            }
        }
        Ok(Self { dims })
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Whether the space has no dimensions.
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// The dimensions in order.
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// Whether `values` has the right length, no NaNs, and lies within
    /// every dimension's bounds.
    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.dims.len()
            && values
                .iter()
                .zip(&self.dims)
                .all(|(&v, d)| !v.is_nan() && v >= d.low && v <= d.high)
    }

    /// Draw a uniformly distributed point.
    ///
    /// Unbounded dimensions are sampled as `0.0` clamped into their bounds.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f32> {
        self.dims
            .iter()
            .map(|d| {
                if d.is_bounded() {
                    rng.random_range(d.low..=d.high)
                } else {
                    0.0f32.clamp(d.low, d.high)
                }
            })
            .collect()
    }

    /// Parameter kinds of all parameter dimensions, in order.
    pub fn parameter_kinds(&self) -> impl Iterator<Item = ParameterKind> + '_ {
        self.dims.iter().filter_map(|d| match d.kind {
            DimensionKind::Parameter(p) => Some(p),
            _ => None,
        })
    }

    /// The action-space variant this space encodes, if all of its
    /// parameter dimensions agree on one.
    pub fn variant(&self) -> Option<Variant> {
        let mut kinds = self.parameter_kinds();
        let first = kinds.next()?.variant();
        kinds.all(|k| k.variant() == first).then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn param(name: &str, kind: ParameterKind) -> Dimension {
        Dimension::new(name, DimensionKind::Parameter(kind), -1.0, 1.0)
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = BoxSpace::new(vec![Dimension::new("x", DimensionKind::Target, 1.0, 0.0)]);
        assert!(matches!(err, Err(SpaceError::InvalidBounds { .. })));
    }

    #[test]
    fn rejects_nan_bounds() {
        let err = BoxSpace::new(vec![Dimension::new(
            "x",
            DimensionKind::Target,
            f32::NAN,
            0.0,
        )]);
        assert!(err.is_err());
    }

    #[test]
    fn contains_checks_length_bounds_and_nan() {
        let space = BoxSpace::new(vec![
            param("a", ParameterKind::Width),
            param("b", ParameterKind::Length),
        ])
        .unwrap();
        assert!(space.contains(&[0.0, 1.0]));
        assert!(!space.contains(&[0.0]));
        assert!(!space.contains(&[0.0, 1.5]));
        assert!(!space.contains(&[f32::NAN, 0.0]));
    }

    #[test]
    fn samples_lie_inside() {
        let space = BoxSpace::new(vec![
            param("a", ParameterKind::GmOverId),
            Dimension::new("p", DimensionKind::Performance, f32::NEG_INFINITY, f32::INFINITY),
        ])
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
    }

    #[test]
    fn variant_of_homogeneous_space() {
        let geom = BoxSpace::new(vec![
            param("W", ParameterKind::Width),
            param("L", ParameterKind::Length),
            param("M", ParameterKind::Multiplicity),
        ])
        .unwrap();
        assert_eq!(geom.variant(), Some(Variant::Geometrical));

        let mixed = BoxSpace::new(vec![
            param("W", ParameterKind::Width),
            param("gmid", ParameterKind::GmOverId),
        ])
        .unwrap();
        assert_eq!(mixed.variant(), None);

        let empty = BoxSpace::new(vec![]).unwrap();
        assert_eq!(empty.variant(), None);
    }
}
