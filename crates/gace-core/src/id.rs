//! Task identifiers: [`Topology`], [`Technology`], [`Variant`] and the
//! composite [`TaskId`].
//!
//! The canonical string form of a task is
//! `"<topology>-<technology>-v<variant>"`, e.g. `op2-xh035-v1`. Parsing is
//! strict: components are lowercase, joined by a single hyphen, and the
//! only accepted spelling of a task is its canonical [`Display`] output.
//!
//! [`Display`]: std::fmt::Display

use std::fmt;
use std::str::FromStr;

/// A circuit design family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topology {
    /// Operational amplifier 1: two-stage Miller OTA.
    Op1,
    /// Operational amplifier 2: symmetrical OTA.
    Op2,
    /// Operational amplifier 3: symmetrical OTA with cascoded outputs.
    Op3,
    /// Operational amplifier 4: telescopic cascode OTA.
    Op4,
    /// Operational amplifier 5: folded-cascode OTA.
    Op5,
    /// Operational amplifier 6: Miller OTA with a cascoded first stage.
    Op6,
    /// Four-input NAND gate.
    Nand4,
    /// Schmitt trigger.
    St1,
}

impl Topology {
    /// Every topology, in catalog order.
    pub const ALL: [Topology; 8] = [
        Self::Op1,
        Self::Op2,
        Self::Op3,
        Self::Op4,
        Self::Op5,
        Self::Op6,
        Self::Nand4,
        Self::St1,
    ];

    /// The identifier component for this topology.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Op1 => "op1",
            Self::Op2 => "op2",
            Self::Op3 => "op3",
            Self::Op4 => "op4",
            Self::Op5 => "op5",
            Self::Op6 => "op6",
            Self::Nand4 => "nand4",
            Self::St1 => "st1",
        }
    }

    /// Whether this is one of the operational amplifiers OP1..OP6.
    pub const fn is_amplifier(self) -> bool {
        !matches!(self, Self::Nand4 | Self::St1)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseTaskIdError::UnknownTopology {
                component: s.to_string(),
            })
    }
}

/// A fabrication process node.
///
/// Only X-FAB XH035 (350 nm) is supported. Further nodes are added as new
/// variants together with their technology data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Technology {
    /// X-FAB XH035, 350 nm.
    Xh035,
}

impl Technology {
    /// Every supported technology.
    pub const ALL: [Technology; 1] = [Self::Xh035];

    /// The identifier component for this technology.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xh035 => "xh035",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseTaskIdError::UnknownTechnology {
                component: s.to_string(),
            })
    }
}

/// The action-space encoding of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// `v0`: electrical parameters (gm/Id and transit frequency per device).
    Electrical,
    /// `v1`: geometrical parameters (width, length, multiplicity per device).
    Geometrical,
    /// `v2`: reserved, no environment implements it yet.
    Reserved,
}

impl Variant {
    /// Every variant, in version order.
    pub const ALL: [Variant; 3] = [Self::Electrical, Self::Geometrical, Self::Reserved];

    /// The version number used in the identifier (`v<n>`).
    pub const fn version(self) -> u8 {
        match self {
            Self::Electrical => 0,
            Self::Geometrical => 1,
            Self::Reserved => 2,
        }
    }

    /// Look up a variant by version number.
    pub const fn from_version(version: u8) -> Option<Self> {
        match version {
            0 => Some(Self::Electrical),
            1 => Some(Self::Geometrical),
            2 => Some(Self::Reserved),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version())
    }
}

impl FromStr for Variant {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.to_string() == s)
            .ok_or_else(|| ParseTaskIdError::UnknownVariant {
                component: s.to_string(),
            })
    }
}

/// Identifies one registered design task.
///
/// Immutable value type; the registry keys its entries by `TaskId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    /// Circuit design family.
    pub topology: Topology,
    /// Fabrication process node.
    pub technology: Technology,
    /// Action-space encoding.
    pub variant: Variant,
}

impl TaskId {
    /// Build a task identifier from its components.
    pub const fn new(topology: Topology, technology: Technology, variant: Variant) -> Self {
        Self {
            topology,
            technology,
            variant,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.topology, self.technology, self.variant)
    }
}

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (Some(topology), Some(technology), Some(variant), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseTaskIdError::Malformed {
                input: s.to_string(),
            });
        };
        Ok(Self {
            topology: topology.parse()?,
            technology: technology.parse()?,
            variant: variant.parse()?,
        })
    }
}

/// Why a string is not a valid [`TaskId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseTaskIdError {
    /// The input does not have exactly three hyphen-separated components.
    Malformed {
        /// The rejected input.
        input: String,
    },
    /// The first component names no known topology.
    UnknownTopology {
        /// The rejected component.
        component: String,
    },
    /// The second component names no known technology.
    UnknownTechnology {
        /// The rejected component.
        component: String,
    },
    /// The third component is not `v0`, `v1` or `v2`.
    UnknownVariant {
        /// The rejected component.
        component: String,
    },
}

impl fmt::Display for ParseTaskIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { input } => write!(
                f,
                "'{input}' is not of the form <topology>-<technology>-v<n>"
            ),
            Self::UnknownTopology { component } => write!(f, "unknown topology '{component}'"),
            Self::UnknownTechnology { component } => {
                write!(f, "unknown technology '{component}'")
            }
            Self::UnknownVariant { component } => write!(f, "unknown variant '{component}'"),
        }
    }
}

impl std::error::Error for ParseTaskIdError {}
