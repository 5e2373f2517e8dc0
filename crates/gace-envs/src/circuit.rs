//! Circuit templates: device groups, architecture and performance targets
//! for every topology.
//!
//! Templates are static data. [`template()`] is an exhaustive match over
//! [`Topology`], so adding a topology without a template does not compile.

use gace_core::{Topology, Variant};

use crate::technology::Polarity;

/// What a device group does in its circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Reference mirror device; only sets bias currents.
    Bias,
    /// Differential input pair.
    Input,
    /// Tail current source of the input pair.
    Tail,
    /// Active load of the first stage.
    Load,
    /// Folding current source of a folded-cascode stage.
    Fold,
    /// n-channel cascode.
    CascodeN,
    /// p-channel cascode.
    CascodeP,
    /// Output (second stage or output mirror) device.
    Output,
    /// Current source loading the output device.
    OutputLoad,
    /// Series pull-down network of a gate.
    PullDown,
    /// Parallel pull-up network of a gate.
    PullUp,
    /// n-channel hysteresis feedback device.
    FeedbackN,
    /// p-channel hysteresis feedback device.
    FeedbackP,
}

/// One sized group of matched transistors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceGroup {
    /// Schematic name, e.g. `"MND1"`.
    pub name: &'static str,
    /// Device polarity.
    pub polarity: Polarity,
    /// Role in the circuit.
    pub role: Role,
    /// Drain current per device as a multiple of the bias current.
    /// Zero for switching (digital) devices.
    pub current: f64,
}

/// Amplifier architecture, which selects the small-signal estimator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Architecture {
    /// Two-stage Miller-compensated OTA.
    Miller {
        /// First stage is cascoded.
        cascoded: bool,
    },
    /// Symmetrical (current-mirror) OTA.
    Symmetrical {
        /// Output branch is cascoded.
        cascoded: bool,
    },
    /// Telescopic cascode OTA.
    Telescopic,
    /// Folded-cascode OTA.
    FoldedCascode,
}

/// Circuit family of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircuitKind {
    /// An operational transconductance amplifier.
    Amplifier(Architecture),
    /// A four-input NAND gate.
    Nand4,
    /// A CMOS Schmitt trigger.
    SchmittTrigger,
}

/// Optimisation direction of a performance metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    /// The target is a lower limit.
    AtLeast,
    /// The target is an upper limit.
    AtMost,
}

/// A simulated performance quantity with its default target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metric {
    /// Metric name, also the key in step info and in the `target` option.
    pub name: &'static str,
    /// SI unit, for display.
    pub unit: &'static str,
    /// Direction of the target.
    pub goal: Goal,
    /// Default target value (SI).
    pub target: f64,
    /// Observation scale: the observation holds `value / scale`.
    pub scale: f64,
}

impl Metric {
    /// Relative amount by which `value` misses `target`; zero when met.
    pub fn shortfall(&self, value: f64, target: f64) -> f64 {
        let denom = target.abs().max(f64::MIN_POSITIVE);
        let miss = match self.goal {
            Goal::AtLeast => (target - value) / denom,
            Goal::AtMost => (value - target) / denom,
        };
        miss.max(0.0)
    }

    /// Signed relative distance; positive means the target is beaten.
    pub fn distance(&self, value: f64, target: f64) -> f64 {
        let denom = target.abs().max(f64::MIN_POSITIVE);
        match self.goal {
            Goal::AtLeast => (value - target) / denom,
            Goal::AtMost => (target - value) / denom,
        }
    }
}

/// Static description of one topology.
#[derive(Debug, PartialEq)]
pub struct CircuitTemplate {
    /// The topology this template implements.
    pub topology: Topology,
    /// Human-readable description.
    pub description: &'static str,
    /// Circuit family.
    pub kind: CircuitKind,
    /// Sized device groups, in action order.
    pub devices: &'static [DeviceGroup],
    /// Reference bias current (A).
    pub bias_current: f64,
    /// Load capacitance at the output (F).
    pub load_capacitance: f64,
    /// Performance metrics, in observation order.
    pub metrics: &'static [Metric],
}

impl CircuitTemplate {
    /// Whether the template can be driven with `variant` actions.
    ///
    /// Electrical actions need a bias current per device, so switching
    /// circuits only support the geometrical variant.
    pub fn supports(&self, variant: Variant) -> bool {
        match (self.kind, variant) {
            (CircuitKind::Amplifier(_), Variant::Electrical | Variant::Geometrical) => true,
            (CircuitKind::Nand4 | CircuitKind::SchmittTrigger, Variant::Geometrical) => true,
            (CircuitKind::Nand4 | CircuitKind::SchmittTrigger, Variant::Electrical) => false,
            (_, Variant::Reserved) => false,
        }
    }

    /// First device group with `role`.
    pub fn find(&self, role: Role) -> Option<(usize, &DeviceGroup)> {
        self.devices.iter().enumerate().find(|(_, d)| d.role == role)
    }

    /// Index of `name` in [`metrics`](CircuitTemplate::metrics).
    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m.name == name)
    }

    /// Drain current of `device` (A).
    pub fn drain_current(&self, device: &DeviceGroup) -> f64 {
        device.current * self.bias_current
    }
}

/// The template for `topology`.
pub fn template(topology: Topology) -> &'static CircuitTemplate {
    match topology {
        Topology::Op1 => &OP1,
        Topology::Op2 => &OP2,
        Topology::Op3 => &OP3,
        Topology::Op4 => &OP4,
        Topology::Op5 => &OP5,
        Topology::Op6 => &OP6,
        Topology::Nand4 => &NAND4,
        Topology::St1 => &ST1,
    }
}

// ── Metrics ────────────────────────────────────────────────────────

const fn metric(name: &'static str, unit: &'static str, goal: Goal, target: f64, scale: f64) -> Metric {
    Metric {
        name,
        unit,
        goal,
        target,
        scale,
    }
}

const AMPLIFIER_METRICS: &[Metric] = &[
    metric("a0", "dB", Goal::AtLeast, 95.0, 100.0),
    metric("ugbw", "Hz", Goal::AtLeast, 3.5e6, 1e6),
    metric("pm", "deg", Goal::AtLeast, 60.0, 90.0),
    metric("sr", "V/s", Goal::AtLeast, 3.5e6, 1e6),
    metric("swing", "V", Goal::AtLeast, 1.8, 1.0),
    metric("area", "m^2", Goal::AtMost, 2000e-12, 1e-12),
];

const NAND4_METRICS: &[Metric] = &[
    metric("tphl", "s", Goal::AtMost, 200e-12, 1e-9),
    metric("tplh", "s", Goal::AtMost, 200e-12, 1e-9),
    metric("vsw_dev", "V", Goal::AtMost, 0.2, 1.0),
    metric("power", "W", Goal::AtMost, 20e-6, 1e-6),
    metric("area", "m^2", Goal::AtMost, 200e-12, 1e-12),
];

const ST1_METRICS: &[Metric] = &[
    metric("vth_hi", "V", Goal::AtLeast, 2.0, 1.0),
    metric("vth_lo", "V", Goal::AtMost, 1.3, 1.0),
    metric("hysteresis", "V", Goal::AtLeast, 0.6, 1.0),
    metric("delay", "s", Goal::AtMost, 1e-9, 1e-9),
    metric("area", "m^2", Goal::AtMost, 200e-12, 1e-12),
];

// ── Templates ──────────────────────────────────────────────────────

const fn dev(name: &'static str, polarity: Polarity, role: Role, current: f64) -> DeviceGroup {
    DeviceGroup {
        name,
        polarity,
        role,
        current,
    }
}

const AMP_BIAS: f64 = 10e-6;
const AMP_LOAD: f64 = 10e-12;
const GATE_LOAD: f64 = 50e-15;

static OP1: CircuitTemplate = CircuitTemplate {
    topology: Topology::Op1,
    description: "two-stage Miller-compensated OTA",
    kind: CircuitKind::Amplifier(Architecture::Miller { cascoded: false }),
    devices: &[
        dev("MNCM11", Polarity::N, Role::Bias, 1.0),
        dev("MNCM12", Polarity::N, Role::Tail, 2.0),
        dev("MND11", Polarity::N, Role::Input, 1.0),
        dev("MPCM21", Polarity::P, Role::Load, 1.0),
        dev("MPCS31", Polarity::P, Role::Output, 8.0),
        dev("MNCM13", Polarity::N, Role::OutputLoad, 8.0),
    ],
    bias_current: AMP_BIAS,
    load_capacitance: AMP_LOAD,
    metrics: AMPLIFIER_METRICS,
};

static OP2: CircuitTemplate = CircuitTemplate {
    topology: Topology::Op2,
    description: "symmetrical OTA",
    kind: CircuitKind::Amplifier(Architecture::Symmetrical { cascoded: false }),
    devices: &[
        dev("MNCM11", Polarity::N, Role::Bias, 1.0),
        dev("MNCM12", Polarity::N, Role::Tail, 2.0),
        dev("MND11", Polarity::N, Role::Input, 1.0),
        dev("MPCM21", Polarity::P, Role::Load, 1.0),
        dev("MPCM22", Polarity::P, Role::Output, 4.0),
        dev("MNCM31", Polarity::N, Role::OutputLoad, 4.0),
    ],
    bias_current: AMP_BIAS,
    load_capacitance: AMP_LOAD,
    metrics: AMPLIFIER_METRICS,
};

static OP3: CircuitTemplate = CircuitTemplate {
    topology: Topology::Op3,
    description: "symmetrical OTA with cascoded outputs",
    kind: CircuitKind::Amplifier(Architecture::Symmetrical { cascoded: true }),
    devices: &[
        dev("MNCM11", Polarity::N, Role::Bias, 1.0),
        dev("MNCM12", Polarity::N, Role::Tail, 2.0),
        dev("MND11", Polarity::N, Role::Input, 1.0),
        dev("MPCM21", Polarity::P, Role::Load, 1.0),
        dev("MPCM22", Polarity::P, Role::Output, 4.0),
        dev("MNCM31", Polarity::N, Role::OutputLoad, 4.0),
        dev("MPC41", Polarity::P, Role::CascodeP, 4.0),
        dev("MNC51", Polarity::N, Role::CascodeN, 4.0),
    ],
    bias_current: AMP_BIAS,
    load_capacitance: AMP_LOAD,
    metrics: AMPLIFIER_METRICS,
};

static OP4: CircuitTemplate = CircuitTemplate {
    topology: Topology::Op4,
    description: "telescopic cascode OTA",
    kind: CircuitKind::Amplifier(Architecture::Telescopic),
    devices: &[
        dev("MNCM11", Polarity::N, Role::Bias, 1.0),
        dev("MNCM12", Polarity::N, Role::Tail, 2.0),
        dev("MND11", Polarity::N, Role::Input, 1.0),
        dev("MNC21", Polarity::N, Role::CascodeN, 1.0),
        dev("MPC31", Polarity::P, Role::CascodeP, 1.0),
        dev("MPCM41", Polarity::P, Role::Load, 1.0),
    ],
    bias_current: AMP_BIAS,
    load_capacitance: AMP_LOAD,
    metrics: AMPLIFIER_METRICS,
};

static OP5: CircuitTemplate = CircuitTemplate {
    topology: Topology::Op5,
    description: "folded-cascode OTA",
    kind: CircuitKind::Amplifier(Architecture::FoldedCascode),
    devices: &[
        dev("MPCM11", Polarity::P, Role::Bias, 1.0),
        dev("MPCM12", Polarity::P, Role::Tail, 2.0),
        dev("MPD11", Polarity::P, Role::Input, 1.0),
        dev("MNCS21", Polarity::N, Role::Fold, 2.0),
        dev("MNC31", Polarity::N, Role::CascodeN, 1.0),
        dev("MPC41", Polarity::P, Role::CascodeP, 1.0),
        dev("MPCM51", Polarity::P, Role::Load, 1.0),
    ],
    bias_current: AMP_BIAS,
    load_capacitance: AMP_LOAD,
    metrics: AMPLIFIER_METRICS,
};

static OP6: CircuitTemplate = CircuitTemplate {
    topology: Topology::Op6,
    description: "two-stage Miller OTA with cascoded first stage",
    kind: CircuitKind::Amplifier(Architecture::Miller { cascoded: true }),
    devices: &[
        dev("MNCM11", Polarity::N, Role::Bias, 1.0),
        dev("MNCM12", Polarity::N, Role::Tail, 2.0),
        dev("MND11", Polarity::N, Role::Input, 1.0),
        dev("MNC21", Polarity::N, Role::CascodeN, 1.0),
        dev("MPC31", Polarity::P, Role::CascodeP, 1.0),
        dev("MPCM41", Polarity::P, Role::Load, 1.0),
        dev("MPCS51", Polarity::P, Role::Output, 8.0),
        dev("MNCM13", Polarity::N, Role::OutputLoad, 8.0),
    ],
    bias_current: AMP_BIAS,
    load_capacitance: AMP_LOAD,
    metrics: AMPLIFIER_METRICS,
};

static NAND4: CircuitTemplate = CircuitTemplate {
    topology: Topology::Nand4,
    description: "four-input NAND gate",
    kind: CircuitKind::Nand4,
    devices: &[
        dev("MN1", Polarity::N, Role::PullDown, 0.0),
        dev("MP1", Polarity::P, Role::PullUp, 0.0),
    ],
    bias_current: 0.0,
    load_capacitance: GATE_LOAD,
    metrics: NAND4_METRICS,
};

static ST1: CircuitTemplate = CircuitTemplate {
    topology: Topology::St1,
    description: "CMOS Schmitt trigger",
    kind: CircuitKind::SchmittTrigger,
    devices: &[
        dev("MN1", Polarity::N, Role::PullDown, 0.0),
        dev("MP1", Polarity::P, Role::PullUp, 0.0),
        dev("MN3", Polarity::N, Role::FeedbackN, 0.0),
        dev("MP3", Polarity::P, Role::FeedbackP, 0.0),
    ],
    bias_current: 0.0,
    load_capacitance: GATE_LOAD,
    metrics: ST1_METRICS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_topology_has_a_matching_template() {
        for t in Topology::ALL {
            let tpl = template(t);
            assert_eq!(tpl.topology, t);
            assert!(!tpl.devices.is_empty());
            assert!(!tpl.metrics.is_empty());
        }
    }

    #[test]
    fn amplifiers_have_input_and_bias_current() {
        for t in Topology::ALL.into_iter().filter(|t| t.is_amplifier()) {
            let tpl = template(t);
            assert!(matches!(tpl.kind, CircuitKind::Amplifier(_)));
            assert!(tpl.find(Role::Input).is_some(), "{t}");
            assert!(tpl.find(Role::Tail).is_some(), "{t}");
            assert!(tpl.find(Role::Load).is_some(), "{t}");
            assert!(tpl.devices.iter().all(|d| tpl.drain_current(d) > 0.0));
        }
    }

    #[test]
    fn variant_support() {
        assert!(template(Topology::Op3).supports(Variant::Electrical));
        assert!(template(Topology::Op3).supports(Variant::Geometrical));
        assert!(!template(Topology::Nand4).supports(Variant::Electrical));
        assert!(template(Topology::St1).supports(Variant::Geometrical));
        assert!(!template(Topology::Op1).supports(Variant::Reserved));
    }

    #[test]
    fn device_and_metric_names_are_unique() {
        for t in Topology::ALL {
            let tpl = template(t);
            for (i, a) in tpl.devices.iter().enumerate() {
                assert!(tpl.devices[i + 1..].iter().all(|b| b.name != a.name));
            }
            for (i, m) in tpl.metrics.iter().enumerate() {
                assert_eq!(tpl.metric_index(m.name), Some(i));
            }
        }
    }

    #[test]
    fn shortfall_and_distance_follow_goal() {
        let gain = metric("a0", "dB", Goal::AtLeast, 50.0, 100.0);
        assert_eq!(gain.shortfall(60.0, 50.0), 0.0);
        assert!((gain.shortfall(40.0, 50.0) - 0.2).abs() < 1e-12);
        assert!((gain.distance(60.0, 50.0) - 0.2).abs() < 1e-12);

        let area = metric("area", "m^2", Goal::AtMost, 1.0, 1.0);
        assert_eq!(area.shortfall(0.5, 1.0), 0.0);
        assert!((area.shortfall(1.5, 1.0) - 0.5).abs() < 1e-12);
        assert!(area.distance(1.5, 1.0) < 0.0);
    }
}
