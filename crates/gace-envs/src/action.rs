//! Normalised action schemas.
//!
//! Agents act in `[-1, 1]` per dimension. An [`ActionSchema`] maps each
//! dimension to a physical design parameter of one device group and turns
//! a full action into one [`Sizing`] per group. The variant decides the
//! parameters: gm/Id and fug for electrical tasks, W, L and M for
//! geometrical ones.

use gace_core::{BoxSpace, Dimension, DimensionKind, ParameterKind, TaskId, Variant};

use crate::circuit::CircuitTemplate;
use crate::config::ConfigError;
use crate::device::Sizing;
use crate::technology::TechnologyData;

/// How a normalised value is spread over a physical range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Uniform in the value.
    Linear,
    /// Uniform in the logarithm of the value.
    Log,
}

/// Physical range of one parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    /// Value at normalised `-1`.
    pub low: f64,
    /// Value at normalised `+1`.
    pub high: f64,
    /// Interpolation between the ends.
    pub scale: Scale,
}

impl ParamRange {
    /// The range of `kind` in `tech`.
    pub fn of(kind: ParameterKind, tech: &TechnologyData) -> Self {
        let (low, high, scale) = match kind {
            ParameterKind::GmOverId => (tech.gmid_range.0, tech.gmid_range.1, Scale::Linear),
            ParameterKind::TransitFrequency => (tech.fug_range.0, tech.fug_range.1, Scale::Log),
            ParameterKind::Width => (tech.w_min, tech.w_max, Scale::Log),
            ParameterKind::Length => (tech.l_min, tech.l_max, Scale::Log),
            ParameterKind::Multiplicity => (1.0, f64::from(tech.m_max), Scale::Linear),
        };
        Self { low, high, scale }
    }

    /// Map a normalised value to the physical range. Inputs outside
    /// `[-1, 1]` are clamped.
    pub fn decode(&self, normalised: f32) -> f64 {
        let t = ((f64::from(normalised) + 1.0) / 2.0).clamp(0.0, 1.0);
        match self.scale {
            Scale::Linear => self.low + t * (self.high - self.low),
            Scale::Log => (self.low.ln() + t * (self.high.ln() - self.low.ln())).exp(),
        }
    }

    /// Map a physical value back to `[-1, 1]`.
    pub fn encode(&self, value: f64) -> f32 {
        let t = match self.scale {
            Scale::Linear => (value - self.low) / (self.high - self.low),
            Scale::Log => (value.ln() - self.low.ln()) / (self.high.ln() - self.low.ln()),
        };
        (2.0 * t.clamp(0.0, 1.0) - 1.0) as f32
    }
}

/// Parameters controlled per device group for `variant`.
pub fn parameters(variant: Variant) -> &'static [ParameterKind] {
    match variant {
        Variant::Electrical => &[ParameterKind::GmOverId, ParameterKind::TransitFrequency],
        Variant::Geometrical => &[
            ParameterKind::Width,
            ParameterKind::Length,
            ParameterKind::Multiplicity,
        ],
        Variant::Reserved => &[],
    }
}

/// Action layout of one task.
#[derive(Clone, Debug)]
pub struct ActionSchema {
    circuit: &'static CircuitTemplate,
    tech: TechnologyData,
    kinds: &'static [ParameterKind],
    space: BoxSpace,
}

impl ActionSchema {
    /// Build the schema of `id`.
    ///
    /// Dimensions are device-major: all parameters of the first device
    /// group, then the second, and so on.
    pub fn new(
        id: TaskId,
        circuit: &'static CircuitTemplate,
        tech: TechnologyData,
    ) -> Result<Self, ConfigError> {
        if !circuit.supports(id.variant) {
            return Err(ConfigError::UnsupportedVariant { id });
        }
        let kinds = parameters(id.variant);
        let dims = circuit
            .devices
            .iter()
            .flat_map(|d| {
                kinds.iter().map(move |&k| {
                    Dimension::new(
                        format!("{}:{}", d.name, k.symbol()),
                        DimensionKind::Parameter(k),
                        -1.0,
                        1.0,
                    )
                })
            })
            .collect();
        Ok(Self {
            circuit,
            tech,
            kinds,
            space: BoxSpace::new(dims).map_err(ConfigError::Space)?,
        })
    }

    /// The normalised action space.
    pub fn space(&self) -> &BoxSpace {
        &self.space
    }

    /// The all-zero action: every parameter at the middle of its range.
    pub fn nominal(&self) -> Vec<f32> {
        vec![0.0; self.space.len()]
    }

    /// Physical value of every action dimension, in action order.
    pub fn decode(&self, action: &[f32]) -> Vec<f64> {
        action
            .iter()
            .zip(self.kinds.iter().cycle())
            .map(|(&a, &k)| ParamRange::of(k, &self.tech).decode(a))
            .collect()
    }

    /// Device sizings realised by `action`.
    ///
    /// `action` must belong to [`space()`](ActionSchema::space).
    pub fn sizing(&self, action: &[f32]) -> Vec<Sizing> {
        let values = self.decode(action);
        self.circuit
            .devices
            .iter()
            .zip(values.chunks(self.kinds.len()))
            .map(|(d, v)| match self.kinds {
                [ParameterKind::GmOverId, ParameterKind::TransitFrequency] => {
                    Sizing::from_electrical(
                        &self.tech,
                        d.polarity,
                        v[0],
                        v[1],
                        self.circuit.drain_current(d),
                    )
                }
                _ => Sizing {
                    w: v[0],
                    l: v[1],
                    m: v[2].round() as u32,
                }
                .clamped(&self.tech),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::template;
    use gace_core::{Technology, Topology};
    use proptest::prelude::*;

    fn xh035() -> TechnologyData {
        TechnologyData::load(Technology::Xh035)
    }

    fn schema(topology: Topology, variant: Variant) -> Result<ActionSchema, ConfigError> {
        ActionSchema::new(
            TaskId::new(topology, Technology::Xh035, variant),
            template(topology),
            xh035(),
        )
    }

    #[test]
    fn electrical_schema_has_two_parameters_per_device() {
        let s = schema(Topology::Op2, Variant::Electrical).unwrap();
        let n = template(Topology::Op2).devices.len();
        assert_eq!(s.space().len(), 2 * n);
        assert_eq!(s.space().variant(), Some(Variant::Electrical));
        assert_eq!(s.space().dims()[0].name, "MNCM11:gmid");
        assert_eq!(s.space().dims()[1].name, "MNCM11:fug");
    }

    #[test]
    fn geometrical_schema_has_three_parameters_per_device() {
        let s = schema(Topology::Op2, Variant::Geometrical).unwrap();
        let n = template(Topology::Op2).devices.len();
        assert_eq!(s.space().len(), 3 * n);
        assert_eq!(s.space().variant(), Some(Variant::Geometrical));
        assert_eq!(s.space().dims()[2].name, "MNCM11:M");
    }

    #[test]
    fn unsupported_variants_are_rejected() {
        assert!(matches!(
            schema(Topology::Nand4, Variant::Electrical),
            Err(ConfigError::UnsupportedVariant { .. })
        ));
        assert!(matches!(
            schema(Topology::Op1, Variant::Reserved),
            Err(ConfigError::UnsupportedVariant { .. })
        ));
    }

    #[test]
    fn range_ends_and_log_midpoint() {
        let tech = xh035();
        let w = ParamRange::of(ParameterKind::Width, &tech);
        assert!((w.decode(-1.0) - tech.w_min).abs() < 1e-15);
        assert!((w.decode(1.0) - tech.w_max).abs() < 1e-12);
        let mid = (tech.w_min * tech.w_max).sqrt();
        assert!((w.decode(0.0) - mid).abs() / mid < 1e-9);
        // Out-of-range inputs clamp.
        assert_eq!(w.decode(3.0), w.decode(1.0));
    }

    #[test]
    fn nominal_geometrical_sizing_is_mid_range() {
        let s = schema(Topology::St1, Variant::Geometrical).unwrap();
        let tech = xh035();
        for sz in s.sizing(&s.nominal()) {
            assert_eq!(sz, sz.clamped(&tech));
            assert!(sz.m >= 1 && sz.m <= tech.m_max);
        }
    }

    proptest! {
        #[test]
        fn encode_inverts_decode(a in -1.0f32..=1.0) {
            let tech = xh035();
            for kind in [ParameterKind::GmOverId, ParameterKind::TransitFrequency, ParameterKind::Length] {
                let r = ParamRange::of(kind, &tech);
                prop_assert!((r.encode(r.decode(a)) - a).abs() < 1e-4);
            }
        }

        #[test]
        fn every_action_sizes_drawable_devices(
            action in proptest::collection::vec(-1.0f32..=1.0, 16)
        ) {
            let tech = xh035();
            let s = schema(Topology::Op6, Variant::Electrical).unwrap();
            for sz in s.sizing(&action[..s.space().len()]) {
                prop_assert_eq!(sz, sz.clamped(&tech));
            }
        }
    }
}
