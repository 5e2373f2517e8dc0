//! Technology data: device constants and sizing limits per process node.

use gace_core::Technology;

/// Thermal voltage kT/q at 300 K (V).
pub const THERMAL_VOLTAGE: f64 = 0.025_85;

/// Transistor polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// n-channel device.
    N,
    /// p-channel device.
    P,
}

/// First-order model constants for one device polarity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceConstants {
    /// Process transconductance parameter µ·Cox (A/V²).
    pub kp: f64,
    /// Threshold voltage magnitude (V).
    pub vth: f64,
    /// Channel-length modulation coefficient; λ = `lambda_l / L` (m/V).
    pub lambda_l: f64,
    /// Sub-threshold slope factor.
    pub slope: f64,
}

impl DeviceConstants {
    /// Weak-inversion limit of gm/Id (S/A).
    pub fn gmid_max(&self) -> f64 {
        1.0 / (self.slope * THERMAL_VOLTAGE)
    }
}

/// Process data for one technology node.
#[derive(Clone, Debug, PartialEq)]
pub struct TechnologyData {
    /// The node this data describes.
    pub technology: Technology,
    /// Minimum feature size (m).
    pub feature_size: f64,
    /// Supply voltage (V).
    pub vdd: f64,
    /// Gate oxide capacitance per area (F/m²).
    pub cox: f64,
    /// Smallest drawable transistor width (m).
    pub w_min: f64,
    /// Largest transistor width per finger (m).
    pub w_max: f64,
    /// Smallest transistor length (m).
    pub l_min: f64,
    /// Largest transistor length (m).
    pub l_max: f64,
    /// Largest multiplicity.
    pub m_max: u32,
    /// gm/Id range exposed by electrical action spaces (S/A).
    pub gmid_range: (f64, f64),
    /// Transit frequency range exposed by electrical action spaces (Hz).
    pub fug_range: (f64, f64),
    /// n-channel constants.
    pub nmos: DeviceConstants,
    /// p-channel constants.
    pub pmos: DeviceConstants,
}

impl TechnologyData {
    /// Load the built-in data for `technology`.
    pub fn load(technology: Technology) -> Self {
        match technology {
            Technology::Xh035 => Self {
                technology,
                feature_size: 350e-9,
                vdd: 3.3,
                cox: 4.54e-3,
                w_min: 0.4e-6,
                w_max: 150e-6,
                l_min: 0.35e-6,
                l_max: 10e-6,
                m_max: 16,
                gmid_range: (5.0, 20.0),
                fug_range: (1e6, 5e9),
                nmos: DeviceConstants {
                    kp: 170e-6,
                    vth: 0.60,
                    lambda_l: 0.08e-6,
                    slope: 1.30,
                },
                pmos: DeviceConstants {
                    kp: 58e-6,
                    vth: 0.70,
                    lambda_l: 0.10e-6,
                    slope: 1.35,
                },
            },
        }
    }

    /// Device constants for `polarity`.
    pub fn device(&self, polarity: Polarity) -> &DeviceConstants {
        match polarity {
            Polarity::N => &self.nmos,
            Polarity::P => &self.pmos,
        }
    }
}
