//! Onboard state shared by the relay loops.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating mode of the remote device.
///
/// Closed set; any other value fails deserialization and is treated as
/// an invalid command by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModeName {
    /// All peripherals quiescent.
    Idle,
    /// Fault-protection posture.
    Safe,
    /// Instruments active.
    Science,
}

impl Default for ModeName {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Safe => write!(f, "SAFE"),
            Self::Science => write!(f, "SCIENCE"),
        }
    }
}

/// The mutable mode register for one session.
///
/// Mutated only by the processor loop; read by the processor (ack
/// snapshots), the telemetry publisher, and the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardState {
    pub mode: ModeName,
}

impl OnboardState {
    /// Fresh state for a new session.
    pub fn new() -> Self {
        Self::default()
    }
}
