//! Order module - the normalized record produced by every extraction
//!
//! A [`NormalizedOrder`] can only be built through [`OrderDraft::normalize`],
//! so the field invariants hold no matter which strategy collected the
//! values:
//!
//! - `device` and `ordering_provider` are never empty (`"Unknown"` is the floor)
//! - `mask_type`, `add_ons` and `qualifier` are only set for CPAP orders
//! - `liters` and `usage` are only set for oxygen orders

use crate::device::Device;
use serde::Serialize;
use std::collections::BTreeSet;

/// Placeholder for a required field that could not be determined
pub const UNKNOWN: &str = "Unknown";

/// The canonical structured DME order
///
/// Immutable once produced. Serializes with camelCase keys and omits
/// absent optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOrder {
    device: Device,
    ordering_provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mask_type: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    add_ons: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qualifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    liters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dob: Option<String>,
}

impl NormalizedOrder {
    /// Ordered device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Ordering provider name, or `"Unknown"`
    pub fn ordering_provider(&self) -> &str {
        &self.ordering_provider
    }

    /// CPAP mask type
    pub fn mask_type(&self) -> Option<&str> {
        self.mask_type.as_deref()
    }

    /// CPAP add-ons such as `humidifier`
    pub fn add_ons(&self) -> &BTreeSet<String> {
        &self.add_ons
    }

    /// CPAP qualifier, e.g. `AHI > 20`
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Oxygen flow rate, formatted `"<number> L"`
    pub fn liters(&self) -> Option<&str> {
        self.liters.as_deref()
    }

    /// Oxygen usage: `sleep`, `exertion` or `sleep and exertion`
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Diagnosis as written in the note
    pub fn diagnosis(&self) -> Option<&str> {
        self.diagnosis.as_deref()
    }

    /// Patient name as written in the note
    pub fn patient_name(&self) -> Option<&str> {
        self.patient_name.as_deref()
    }

    /// Date of birth, in the format found in the note
    pub fn dob(&self) -> Option<&str> {
        self.dob.as_deref()
    }
}

/// Field values collected by an extraction strategy before normalization
///
/// Every field is optional; [`OrderDraft::normalize`] fills defaults and
/// drops values that do not belong to the ordered device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    /// Detected device
    pub device: Option<Device>,
    /// Ordering provider
    pub ordering_provider: Option<String>,
    /// CPAP mask type
    pub mask_type: Option<String>,
    /// CPAP add-ons
    pub add_ons: BTreeSet<String>,
    /// CPAP qualifier
    pub qualifier: Option<String>,
    /// Oxygen flow rate
    pub liters: Option<String>,
    /// Oxygen usage
    pub usage: Option<String>,
    /// Diagnosis
    pub diagnosis: Option<String>,
    /// Patient name
    pub patient_name: Option<String>,
    /// Date of birth
    pub dob: Option<String>,
}

impl OrderDraft {
    /// Create an empty draft for the given device
    pub fn for_device(device: Device) -> Self {
        Self {
            device: Some(device),
            ..Self::default()
        }
    }

    /// Normalize the draft into an immutable order
    pub fn normalize(self) -> NormalizedOrder {
        let device = match self.device {
            Some(Device::Other(name)) => Device::canonicalize(&name),
            Some(device) => device,
            None => Device::Unknown,
        };

        let ordering_provider = self
            .ordering_provider
            .as_deref()
            .map(|p| p.trim().trim_end_matches(['.', ' ']))
            .filter(|p| !p.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();

        let is_cpap = device == Device::Cpap;
        let is_oxygen = device == Device::OxygenTank;

        let add_ons = if is_cpap {
            self.add_ons
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            BTreeSet::new()
        };

        NormalizedOrder {
            mask_type: clean(self.mask_type).filter(|_| is_cpap),
            add_ons,
            qualifier: clean(self.qualifier).filter(|_| is_cpap),
            liters: clean(self.liters).filter(|_| is_oxygen),
            usage: clean(self.usage).filter(|_| is_oxygen),
            diagnosis: clean(self.diagnosis),
            patient_name: clean(self.patient_name),
            dob: clean(self.dob),
            device,
            ordering_provider,
        }
    }
}

/// Trim a value and treat blank strings as absent
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
