//! Keyword and pattern rules for rule-based extraction
//!
//! Each rule reads one field from the note and knows nothing about the
//! others. A rule that finds nothing returns `None` (or an empty set); it
//! never fails.

use dme_domain::Device;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static RE_DOCTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)dr\.").expect("valid doctor regex"));
static RE_ORDERED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ordered by ").expect("valid ordered-by regex"));
static RE_ORDERING_PHYSICIAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^ordering physician:").expect("valid ordering-physician regex")
});
static RE_AHI_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)AHI[\s:>]*(\d+)").expect("valid AHI regex"));
static RE_LITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*L").expect("valid liters regex"));
static RE_PATIENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Patient Name:[ \t]*([^\r\n]*)").expect("valid patient name regex")
});
static RE_DOB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)DOB:[ \t]*([^\r\n]*)").expect("valid DOB regex"));
static RE_DIAGNOSIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Diagnosis:[ \t]*([^\r\n]*)").expect("valid diagnosis regex")
});

/// Qualifier recorded when the literal threshold phrase is present
const AHI_DEFAULT_QUALIFIER: &str = "AHI > 20";

fn contains_ci(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

/// Classify the ordered device; first keyword wins
pub fn classify_device(text: &str) -> Device {
    let lower = text.to_lowercase();
    if lower.contains("cpap") {
        Device::Cpap
    } else if lower.contains("oxygen") {
        Device::OxygenTank
    } else if lower.contains("wheelchair") {
        Device::Wheelchair
    } else {
        Device::Unknown
    }
}

/// Ordering provider: from the first `Dr.` to the end of that line
pub fn ordering_provider(text: &str) -> Option<String> {
    let start = RE_DOCTOR.find(text)?.start();
    let mut rest = &text[start..];

    for prefix in [&*RE_ORDERED_BY, &*RE_ORDERING_PHYSICIAN] {
        if let Some(m) = prefix.find(rest) {
            rest = &rest[m.end()..];
        }
    }

    let first_line = rest.split('\n').next().unwrap_or_default();
    let name = first_line.trim().trim_end_matches(['.', ' ']);

    (!name.is_empty()).then(|| name.to_string())
}

/// CPAP mask type
pub fn mask_type(text: &str) -> Option<String> {
    contains_ci(text, "full face").then(|| "full face".to_string())
}

/// CPAP add-ons
pub fn add_ons(text: &str) -> BTreeSet<String> {
    let mut add_ons = BTreeSet::new();
    if contains_ci(text, "humidifier") {
        add_ons.insert("humidifier".to_string());
    }
    add_ons
}

/// CPAP qualifier from an AHI threshold
///
/// `AHI` with digits yields `AHI > {digits}`. Without parseable digits the
/// literal `AHI > 20` is honored; otherwise the qualifier is absent.
pub fn ahi_qualifier(text: &str) -> Option<String> {
    if !contains_ci(text, "ahi") {
        return None;
    }

    if let Some(caps) = RE_AHI_VALUE.captures(text) {
        return Some(format!("AHI > {}", &caps[1]));
    }

    text.contains(AHI_DEFAULT_QUALIFIER)
        .then(|| AHI_DEFAULT_QUALIFIER.to_string())
}

/// Oxygen flow rate, number preserved exactly as written
pub fn liters(text: &str) -> Option<String> {
    RE_LITERS
        .captures(text)
        .map(|caps| format!("{} L", &caps[1]))
}

/// Oxygen usage from the `sleep` and `exertion` keywords
pub fn usage(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let usage = match (lower.contains("sleep"), lower.contains("exertion")) {
        (true, true) => "sleep and exertion",
        (true, false) => "sleep",
        (false, true) => "exertion",
        (false, false) => return None,
    };
    Some(usage.to_string())
}

/// Value of a `Patient Name:` line
pub fn patient_name(text: &str) -> Option<String> {
    line_value(&RE_PATIENT_NAME, text)
}

/// Value of a `DOB:` line, unnormalized
pub fn date_of_birth(text: &str) -> Option<String> {
    line_value(&RE_DOB, text)
}

/// Value of a `Diagnosis:` line
pub fn diagnosis(text: &str) -> Option<String> {
    line_value(&RE_DIAGNOSIS, text)
}

fn line_value(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    let value = caps[1].trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_device_priority() {
        assert_eq!(classify_device("needs a CPAP"), Device::Cpap);
        assert_eq!(classify_device("cpap and oxygen bleed"), Device::Cpap);
        assert_eq!(classify_device("portable OXYGEN tank"), Device::OxygenTank);
        assert_eq!(classify_device("oxygen while in wheelchair"), Device::OxygenTank);
        assert_eq!(classify_device("Wheelchair for mobility"), Device::Wheelchair);
        assert_eq!(classify_device("some medical equipment"), Device::Unknown);
    }

    #[test]
    fn test_provider_ordered_by() {
        assert_eq!(
            ordering_provider("AHI > 20. Ordered by Dr. Cameron."),
            Some("Dr. Cameron".to_string())
        );
    }

    #[test]
    fn test_provider_stops_at_newline() {
        let note = "Ordering Physician: Dr. Cuddy\nDOB: 01/02/1960";
        assert_eq!(ordering_provider(note), Some("Dr. Cuddy".to_string()));
    }

    #[test]
    fn test_provider_case_insensitive() {
        assert_eq!(
            ordering_provider("signed DR. Wilson"),
            Some("DR. Wilson".to_string())
        );
    }

    #[test]
    fn test_provider_keeps_sentence_fragments_on_same_line() {
        assert_eq!(
            ordering_provider("Ordered by Dr. House. Follow up in 2 weeks."),
            Some("Dr. House. Follow up in 2 weeks".to_string())
        );
    }

    #[test]
    fn test_provider_absent() {
        assert_eq!(ordering_provider("Patient needs a CPAP machine."), None);
        assert_eq!(ordering_provider(""), None);
    }

    #[test]
    fn test_provider_crlf() {
        assert_eq!(
            ordering_provider("Dr. Chase\r\nPatient Name: Jane"),
            Some("Dr. Chase".to_string())
        );
    }

    #[test]
    fn test_mask_type() {
        assert_eq!(mask_type("Full Face mask"), Some("full face".to_string()));
        assert_eq!(mask_type("nasal mask"), None);
    }

    #[test]
    fn test_add_ons() {
        assert!(add_ons("with HUMIDIFIER").contains("humidifier"));
        assert!(add_ons("no extras").is_empty());
    }

    #[test]
    fn test_ahi_qualifier_variants() {
        assert_eq!(ahi_qualifier("AHI > 20."), Some("AHI > 20".to_string()));
        assert_eq!(ahi_qualifier("AHI: 35"), Some("AHI > 35".to_string()));
        assert_eq!(ahi_qualifier("ahi 15 events/hr"), Some("AHI > 15".to_string()));
        assert_eq!(ahi_qualifier("AHI>42"), Some("AHI > 42".to_string()));
    }

    #[test]
    fn test_ahi_without_digits_is_absent() {
        assert_eq!(ahi_qualifier("AHI elevated, see sleep study"), None);
        assert_eq!(ahi_qualifier("no index mentioned"), None);
    }

    #[test]
    fn test_liters_preserves_precision() {
        assert_eq!(liters("delivering 2 L per minute"), Some("2 L".to_string()));
        assert_eq!(liters("at 2.5L/min"), Some("2.5 L".to_string()));
        assert_eq!(liters("flow 0.50 l"), Some("0.50 L".to_string()));
        assert_eq!(liters("no flow given"), None);
    }

    #[test]
    fn test_usage() {
        assert_eq!(usage("during Sleep and exertion"), Some("sleep and exertion".to_string()));
        assert_eq!(usage("during sleep"), Some("sleep".to_string()));
        assert_eq!(usage("on EXERTION"), Some("exertion".to_string()));
        assert_eq!(usage("continuous"), None);
    }

    #[test]
    fn test_labeled_fields() {
        let note = "Patient Name: Harold Finch\nDOB: 04/12/1952\nDiagnosis: Severe sleep apnea\n";
        assert_eq!(patient_name(note), Some("Harold Finch".to_string()));
        assert_eq!(date_of_birth(note), Some("04/12/1952".to_string()));
        assert_eq!(diagnosis(note), Some("Severe sleep apnea".to_string()));
    }

    #[test]
    fn test_labeled_fields_case_insensitive_and_at_end() {
        assert_eq!(patient_name("patient name:  Lisa Cuddy  "), Some("Lisa Cuddy".to_string()));
        assert_eq!(date_of_birth("dob: 1970-01-01"), Some("1970-01-01".to_string()));
    }

    #[test]
    fn test_labeled_field_blank_is_absent() {
        assert_eq!(diagnosis("Diagnosis:   \nNext line"), None);
        assert_eq!(patient_name("no labels here"), None);
    }
}
