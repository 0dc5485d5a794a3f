//! Device module - the kinds of equipment an order can name

use serde::{Serialize, Serializer};
use std::fmt;

/// Durable Medical Equipment named by an order
///
/// The rule-based path only ever yields the four fixed variants. The
/// model-based path may also yield [`Device::Other`] with free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Device {
    /// Continuous positive airway pressure machine
    Cpap,

    /// Supplemental oxygen tank or concentrator
    OxygenTank,

    /// Manual or powered wheelchair
    Wheelchair,

    /// No recognized device keyword
    Unknown,

    /// Free-text device reported by a model
    Other(String),
}

impl Device {
    /// Get the device name as it appears in a serialized order
    pub fn as_str(&self) -> &str {
        match self {
            Device::Cpap => "CPAP",
            Device::OxygenTank => "Oxygen Tank",
            Device::Wheelchair => "Wheelchair",
            Device::Unknown => "Unknown",
            Device::Other(name) => name,
        }
    }

    /// Canonicalize a device name reported by any strategy
    ///
    /// Keyword priority matches rule-based classification: `cpap`, then
    /// `oxygen`, then `wheelchair`. Blank input and the literal `unknown`
    /// map to [`Device::Unknown`]; anything else is kept as trimmed free text.
    pub fn canonicalize(name: &str) -> Self {
        let trimmed = name.trim();
        let lower = trimmed.to_lowercase();

        if lower.is_empty() || lower == "unknown" {
            Device::Unknown
        } else if lower.contains("cpap") {
            Device::Cpap
        } else if lower.contains("oxygen") {
            Device::OxygenTank
        } else if lower.contains("wheelchair") {
            Device::Wheelchair
        } else {
            Device::Other(trimmed.to_string())
        }
    }

    /// Whether the device is a recognized member of the fixed vocabulary
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Device::Unknown | Device::Other(_))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Device {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Device {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for Device {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
