//! Simulator backends.
//!
//! A [`Simulator`] evaluates a sized [`CircuitTemplate`] and reports its
//! performance. [`open_backend`] selects a backend by name; the only
//! built-in one is [`SurrogateSimulator`], a closed-form first-order model
//! that needs no external tools and is fully deterministic.

use std::f64::consts::{LN_2, PI};
use std::fmt;

use indexmap::IndexMap;

use crate::circuit::{Architecture, CircuitKind, CircuitTemplate, Role};
use crate::device::{OperatingPoint, Sizing};
use crate::technology::TechnologyData;

/// Simulated performance values keyed by metric name (SI units).
pub type Performance = IndexMap<&'static str, f64>;

/// Names accepted by [`open_backend`].
pub const BACKENDS: &[&str] = &["surrogate"];

/// A circuit simulator.
pub trait Simulator: Send {
    /// Backend name, as accepted by [`open_backend`].
    fn name(&self) -> &str;

    /// Evaluate `circuit` with one [`Sizing`] per device group.
    fn simulate(
        &mut self,
        circuit: &CircuitTemplate,
        sizing: &[Sizing],
    ) -> Result<Performance, SimulationError>;
}

/// Errors from [`Simulator::simulate`].
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// The number of sizings does not match the number of device groups.
    SizingMismatch {
        /// Device groups in the template.
        expected: usize,
        /// Sizings supplied.
        actual: usize,
    },
    /// The template lacks a device the estimator needs.
    MissingDevice {
        /// The missing role.
        role: Role,
    },
    /// The estimate for a metric is NaN or infinite.
    NonFinite {
        /// The offending metric.
        metric: &'static str,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizingMismatch { expected, actual } => write!(
                f,
                "expected {expected} device sizings, got {actual}"
            ),
            Self::MissingDevice { role } => write!(f, "circuit has no {role:?} device"),
            Self::NonFinite { metric } => write!(f, "metric '{metric}' is not finite"),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Errors from [`open_backend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// No backend of that name exists.
    Unknown {
        /// The requested name.
        name: String,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(
                f,
                "simulator backend '{name}' is not available (available: {})",
                BACKENDS.join(", ")
            ),
        }
    }
}

impl std::error::Error for BackendError {}

/// Open the simulator backend called `name` for `tech`.
pub fn open_backend(name: &str, tech: &TechnologyData) -> Result<Box<dyn Simulator>, BackendError> {
    match name {
        "surrogate" => Ok(Box::new(SurrogateSimulator::new(tech.clone()))),
        _ => Err(BackendError::Unknown {
            name: name.to_string(),
        }),
    }
}

// ── Surrogate model ────────────────────────────────────────────────

/// Miller capacitance as a fraction of the load capacitance.
const MILLER_RATIO: f64 = 0.3;
/// Drain junction capacitance as a fraction of the gate capacitance.
const DRAIN_CAP_RATIO: f64 = 0.25;
/// Toggle rate assumed for dynamic power (Hz).
const SWITCHING_FREQUENCY: f64 = 10e6;

/// Closed-form first-order circuit estimator.
#[derive(Clone, Debug)]
pub struct SurrogateSimulator {
    tech: TechnologyData,
}

impl SurrogateSimulator {
    /// A surrogate for `tech`.
    pub fn new(tech: TechnologyData) -> Self {
        Self { tech }
    }

    fn operating_point(
        &self,
        circuit: &CircuitTemplate,
        sizing: &[Sizing],
        role: Role,
    ) -> Result<OperatingPoint, SimulationError> {
        let (i, d) = circuit
            .find(role)
            .ok_or(SimulationError::MissingDevice { role })?;
        Ok(OperatingPoint::evaluate(
            &self.tech,
            d.polarity,
            &sizing[i],
            circuit.drain_current(d),
        ))
    }

    fn sizing_of<'a>(
        circuit: &CircuitTemplate,
        sizing: &'a [Sizing],
        role: Role,
    ) -> Result<&'a Sizing, SimulationError> {
        circuit
            .find(role)
            .map(|(i, _)| &sizing[i])
            .ok_or(SimulationError::MissingDevice { role })
    }

    fn amplifier(
        &self,
        circuit: &CircuitTemplate,
        arch: Architecture,
        sizing: &[Sizing],
    ) -> Result<Performance, SimulationError> {
        let op = |role| self.operating_point(circuit, sizing, role);
        let vdd = self.tech.vdd;
        let cl = circuit.load_capacitance;
        let input = op(Role::Input)?;
        let tail = op(Role::Tail)?;
        let load = op(Role::Load)?;

        let (gain, ugbw, pm, sr, swing) = match arch {
            Architecture::Miller { cascoded } => {
                let out = op(Role::Output)?;
                let out_load = op(Role::OutputLoad)?;
                let g1 = if cascoded {
                    let cn = op(Role::CascodeN)?;
                    let cp = op(Role::CascodeP)?;
                    cascode(input.gds, &cn) + cascode(load.gds, &cp)
                } else {
                    input.gds + load.gds
                };
                let cc = MILLER_RATIO * cl;
                let gain = input.gm / g1 * out.gm / (out.gds + out_load.gds);
                let ugbw = input.gm / (2.0 * PI * cc);
                let p2 = out.gm / (2.0 * PI * cl);
                let zero = out.gm / (2.0 * PI * cc);
                let pm = phase_margin(ugbw, &[p2, zero]);
                let sr = (tail.id / cc).min(out.id / (cc + cl));
                (gain, ugbw, pm, sr, vdd - out.vdsat() - out_load.vdsat())
            }
            Architecture::Symmetrical { cascoded } => {
                let out = op(Role::Output)?;
                let out_load = op(Role::OutputLoad)?;
                let mirror = out.id / load.id;
                let (g_out, stack) = if cascoded {
                    let cn = op(Role::CascodeN)?;
                    let cp = op(Role::CascodeP)?;
                    (
                        cascode(out.gds, &cp) + cascode(out_load.gds, &cn),
                        cn.vdsat() + cp.vdsat(),
                    )
                } else {
                    (out.gds + out_load.gds, 0.0)
                };
                let gain = mirror * input.gm / g_out;
                let ugbw = mirror * input.gm / (2.0 * PI * cl);
                let p2 = load.gm / (2.0 * PI * (load.cgg + out.cgg));
                let pm = phase_margin(ugbw, &[p2]);
                let sr = mirror * tail.id / cl;
                let swing = vdd - out.vdsat() - out_load.vdsat() - stack;
                (gain, ugbw, pm, sr, swing)
            }
            Architecture::Telescopic | Architecture::FoldedCascode => {
                let cn = op(Role::CascodeN)?;
                let cp = op(Role::CascodeP)?;
                let (g_lower, stack) = if arch == Architecture::FoldedCascode {
                    let fold = op(Role::Fold)?;
                    (input.gds + fold.gds, fold.vdsat())
                } else {
                    (input.gds, tail.vdsat() + input.vdsat())
                };
                let g = cascode(g_lower, &cn) + cascode(load.gds, &cp);
                let gain = input.gm / g;
                let ugbw = input.gm / (2.0 * PI * cl);
                let mirror_pole = load.gm / (2.0 * PI * 2.0 * load.cgg);
                let pm = phase_margin(ugbw, &[cn.fug(), mirror_pole]);
                let sr = tail.id / cl;
                let swing = vdd - stack - cn.vdsat() - cp.vdsat() - load.vdsat();
                (gain, ugbw, pm, sr, swing)
            }
        };

        let area: f64 = sizing.iter().map(Sizing::area).sum();
        Ok(Performance::from_iter([
            ("a0", 20.0 * gain.log10()),
            ("ugbw", ugbw),
            ("pm", pm),
            ("sr", sr),
            ("swing", swing),
            ("area", area),
        ]))
    }

    fn nand4(&self, circuit: &CircuitTemplate, sizing: &[Sizing]) -> Result<Performance, SimulationError> {
        let (n, p, vdd) = (&self.tech.nmos, &self.tech.pmos, self.tech.vdd);
        let pd = Self::sizing_of(circuit, sizing, Role::PullDown)?;
        let pu = Self::sizing_of(circuit, sizing, Role::PullUp)?;
        let beta_n = n.kp * pd.aspect();
        let beta_p = p.kp * pu.aspect();

        // Output node: four parallel pull-up drains and the top of the stack.
        let c_par = self.drain_capacitance(4.0 * pu.area() + pd.area());
        let c_out = circuit.load_capacitance + c_par;
        let r_down = 4.0 / (beta_n * (vdd - n.vth));
        let r_up = 1.0 / (beta_p * (vdd - p.vth));

        // All inputs switching together: four series vs four parallel devices.
        let k = (16.0 * beta_p / beta_n).sqrt();
        let vsw = (n.vth + k * (vdd - p.vth)) / (1.0 + k);

        Ok(Performance::from_iter([
            ("tphl", LN_2 * r_down * c_out),
            ("tplh", LN_2 * r_up * c_out),
            ("vsw_dev", (vsw - vdd / 2.0).abs()),
            ("power", c_out * vdd * vdd * SWITCHING_FREQUENCY),
            ("area", 4.0 * (pd.area() + pu.area())),
        ]))
    }

    fn schmitt_trigger(
        &self,
        circuit: &CircuitTemplate,
        sizing: &[Sizing],
    ) -> Result<Performance, SimulationError> {
        let (n, p, vdd) = (&self.tech.nmos, &self.tech.pmos, self.tech.vdd);
        let mn1 = Self::sizing_of(circuit, sizing, Role::PullDown)?;
        let mp1 = Self::sizing_of(circuit, sizing, Role::PullUp)?;
        let mn3 = Self::sizing_of(circuit, sizing, Role::FeedbackN)?;
        let mp3 = Self::sizing_of(circuit, sizing, Role::FeedbackP)?;

        let kn = (mn1.aspect() / mn3.aspect()).sqrt();
        let vth_hi = (vdd + kn * n.vth) / (1.0 + kn);
        let kp = (mp1.aspect() / mp3.aspect()).sqrt();
        let vth_lo = kp * (vdd - p.vth) / (1.0 + kp);

        // Two input devices in series on each side.
        let r_down = 2.0 / (n.kp * mn1.aspect() * (vdd - n.vth));
        let r_up = 2.0 / (p.kp * mp1.aspect() * (vdd - p.vth));
        let c_par = self.drain_capacitance(mn1.area() + mp1.area() + mn3.area() + mp3.area());
        let c_out = circuit.load_capacitance + c_par;

        Ok(Performance::from_iter([
            ("vth_hi", vth_hi),
            ("vth_lo", vth_lo),
            ("hysteresis", vth_hi - vth_lo),
            ("delay", LN_2 * 0.5 * (r_down + r_up) * c_out),
            (
                "area",
                2.0 * (mn1.area() + mp1.area()) + mn3.area() + mp3.area(),
            ),
        ]))
    }

    fn drain_capacitance(&self, gate_area: f64) -> f64 {
        DRAIN_CAP_RATIO * 2.0 / 3.0 * self.tech.cox * gate_area
    }
}

impl Simulator for SurrogateSimulator {
    fn name(&self) -> &str {
        "surrogate"
    }

    fn simulate(
        &mut self,
        circuit: &CircuitTemplate,
        sizing: &[Sizing],
    ) -> Result<Performance, SimulationError> {
        if sizing.len() != circuit.devices.len() {
            return Err(SimulationError::SizingMismatch {
                expected: circuit.devices.len(),
                actual: sizing.len(),
            });
        }
        let perf = match circuit.kind {
            CircuitKind::Amplifier(arch) => self.amplifier(circuit, arch, sizing)?,
            CircuitKind::Nand4 => self.nand4(circuit, sizing)?,
            CircuitKind::SchmittTrigger => self.schmitt_trigger(circuit, sizing)?,
        };
        if let Some((&metric, _)) = perf.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimulationError::NonFinite { metric });
        }
        Ok(perf)
    }
}

/// Output conductance of a node whose lower device (conductance `g`) is
/// shielded by cascode `casc`.
fn cascode(g: f64, casc: &OperatingPoint) -> f64 {
    g * casc.gds / casc.gm
}

/// Phase margin (degrees) at `ugbw` given the non-dominant poles/zeros.
fn phase_margin(ugbw: f64, poles: &[f64]) -> f64 {
    90.0 - poles
        .iter()
        .map(|p| (ugbw / p).atan().to_degrees())
        .sum::<f64>()
}
