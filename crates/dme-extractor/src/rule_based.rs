//! Deterministic rule-based extraction

use crate::error::ExtractorError;
use crate::rules;
use dme_domain::{Device, NormalizedOrder, OrderDraft};
use tracing::{debug, warn};

/// Extracts orders with keyword and pattern rules only
///
/// Pure computation: no I/O, no shared state. Any non-empty note yields a
/// record; fields the rules cannot find are left absent or `"Unknown"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    /// Create a new rule-based extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract an order from note text
    pub fn extract(&self, note: &str) -> Result<NormalizedOrder, ExtractorError> {
        if note.trim().is_empty() {
            return Err(ExtractorError::InvalidInput(
                "note text is empty".to_string(),
            ));
        }

        let device = rules::classify_device(note);
        if device == Device::Unknown {
            warn!("No recognized device keyword in note ({} chars)", note.len());
        }

        let mut draft = OrderDraft::for_device(device.clone());
        draft.ordering_provider = rules::ordering_provider(note);
        draft.patient_name = rules::patient_name(note);
        draft.dob = rules::date_of_birth(note);
        draft.diagnosis = rules::diagnosis(note);

        match device {
            Device::Cpap => {
                draft.mask_type = rules::mask_type(note);
                draft.add_ons = rules::add_ons(note);
                draft.qualifier = rules::ahi_qualifier(note);
            }
            Device::OxygenTank => {
                draft.liters = rules::liters(note);
                draft.usage = rules::usage(note);
            }
            _ => {}
        }

        let order = draft.normalize();
        debug!("Rule-based extraction produced device '{}'", order.device());
        Ok(order)
    }
}
