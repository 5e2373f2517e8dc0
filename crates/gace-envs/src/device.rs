//! First-order MOS device model.
//!
//! Two directions are supported:
//!
//! - [`Sizing::from_electrical`] turns a gm/Id + fug design point and a
//!   drain current into a drawable W/L/M, clamped to the technology limits.
//! - [`OperatingPoint::evaluate`] turns a drawn device and its drain current
//!   back into small-signal quantities.
//!
//! The gm/Id curve interpolates smoothly between strong inversion
//! (`2 / Vov`) and the weak-inversion ceiling `1 / (n·Ut)`:
//!
//! ```text
//! gm/Id = 1 / (n·Ut + sqrt(Id / (2·β)))      β = kp·M·W/L
//! ```

use std::f64::consts::PI;

use crate::technology::{Polarity, TechnologyData, THERMAL_VOLTAGE};

/// Drawn dimensions of one device group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sizing {
    /// Finger width (m).
    pub w: f64,
    /// Channel length (m).
    pub l: f64,
    /// Number of parallel fingers.
    pub m: u32,
}

impl Sizing {
    /// Total gate area M·W·L (m²).
    pub fn area(&self) -> f64 {
        f64::from(self.m) * self.w * self.l
    }

    /// Effective width-to-length ratio M·W/L.
    pub fn aspect(&self) -> f64 {
        f64::from(self.m) * self.w / self.l
    }

    /// Clamp into the drawable range of `tech`.
    pub fn clamped(self, tech: &TechnologyData) -> Self {
        Self {
            w: self.w.clamp(tech.w_min, tech.w_max),
            l: self.l.clamp(tech.l_min, tech.l_max),
            m: self.m.clamp(1, tech.m_max),
        }
    }

    /// Size a device that carries `id` amps at the given gm/Id (S/A) and
    /// transit frequency (Hz).
    ///
    /// Widths beyond the per-finger limit are split into fingers. The
    /// result is clamped to the technology limits, so the realised design
    /// point can differ from the requested one at the edges of the range.
    pub fn from_electrical(
        tech: &TechnologyData,
        polarity: Polarity,
        gmid: f64,
        fug: f64,
        id: f64,
    ) -> Self {
        let dev = tech.device(polarity);
        // Half the overdrive; positive as long as gmid < 1/(n·Ut).
        let half_ov = (1.0 / gmid - dev.slope * THERMAL_VOLTAGE).max(1e-4);
        let beta = id / (2.0 * half_ov * half_ov);
        let ratio = beta / dev.kp;

        let cgg = gmid * id / (2.0 * PI * fug);
        let l = (1.5 * cgg / (tech.cox * ratio)).sqrt();
        let w_total = ratio * l;

        let m = (w_total / tech.w_max).ceil().max(1.0);
        let m = if m > f64::from(tech.m_max) {
            tech.m_max
        } else {
            m as u32
        };
        Self {
            w: w_total / f64::from(m),
            l,
            m,
        }
        .clamped(tech)
    }
}

/// Small-signal operating point of a biased device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatingPoint {
    /// Drain current (A).
    pub id: f64,
    /// Transconductance efficiency (S/A).
    pub gmid: f64,
    /// Transconductance (S).
    pub gm: f64,
    /// Output conductance (S).
    pub gds: f64,
    /// Total gate capacitance (F).
    pub cgg: f64,
}

impl OperatingPoint {
    /// Evaluate a device of size `sizing` carrying `id` amps.
    pub fn evaluate(tech: &TechnologyData, polarity: Polarity, sizing: &Sizing, id: f64) -> Self {
        let dev = tech.device(polarity);
        let beta = dev.kp * sizing.aspect();
        let gmid = 1.0 / (dev.slope * THERMAL_VOLTAGE + (id / (2.0 * beta)).sqrt());
        Self {
            id,
            gmid,
            gm: gmid * id,
            gds: id * dev.lambda_l / sizing.l,
            cgg: 2.0 / 3.0 * tech.cox * sizing.area(),
        }
    }

    /// Transit frequency gm / (2π·Cgg) (Hz).
    pub fn fug(&self) -> f64 {
        self.gm / (2.0 * PI * self.cgg)
    }

    /// Intrinsic gain gm / gds.
    pub fn self_gain(&self) -> f64 {
        self.gm / self.gds
    }

    /// Effective saturation voltage 2 / (gm/Id) (V).
    pub fn vdsat(&self) -> f64 {
        2.0 / self.gmid
    }
}
