//! Parse LLM output into an order draft
//!
//! Unlike the rule-based path, nothing here degrades silently: an empty
//! reply, invalid JSON, a missing or unexpected field, or a value of the
//! wrong type is an error.

use crate::error::UpstreamError;
use crate::rules;
use crate::schema::{FieldKind, OrderSchema};
use dme_domain::{Device, OrderDraft};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Parse an LLM response into a draft, validating it against the schema
pub fn parse_model_response(
    response: &str,
    schema: &OrderSchema,
) -> Result<OrderDraft, UpstreamError> {
    if response.trim().is_empty() {
        return Err(UpstreamError::EmptyResponse);
    }

    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;
    let json: Value = serde_json::from_str(&json_str)?;

    let object = json
        .as_object()
        .ok_or_else(|| UpstreamError::Schema("Expected JSON object".to_string()))?;

    let mut values: HashMap<&'static str, FieldValue> = HashMap::new();
    for (key, value) in object {
        let field = schema
            .field(key)
            .ok_or_else(|| UpstreamError::Schema(format!("Unexpected field '{}'", key)))?;

        let parsed = match field.kind {
            FieldKind::Text => FieldValue::Text(expect_string(field.name, value)?),
            FieldKind::TextList => FieldValue::List(expect_string_list(field.name, value)?),
        };

        if values.insert(field.name, parsed).is_some() {
            return Err(UpstreamError::Schema(format!(
                "Field '{}' appears more than once",
                field.name
            )));
        }
    }

    if let Some(missing) = schema.fields().find(|f| !values.contains_key(f.name)) {
        return Err(UpstreamError::Schema(format!("Missing field '{}'", missing.name)));
    }

    let mut draft = OrderDraft::default();
    for (name, value) in values {
        match (name, value) {
            ("device", FieldValue::Text(v)) => draft.device = Some(Device::canonicalize(&v)),
            ("orderingProvider", FieldValue::Text(v)) => draft.ordering_provider = Some(v),
            ("maskType", FieldValue::Text(v)) => draft.mask_type = Some(v),
            ("qualifier", FieldValue::Text(v)) => draft.qualifier = Some(v),
            ("liters", FieldValue::Text(v)) => draft.liters = normalize_liters(&v),
            ("usage", FieldValue::Text(v)) => draft.usage = rules::usage(&v),
            ("diagnosis", FieldValue::Text(v)) => draft.diagnosis = Some(v),
            ("patientName", FieldValue::Text(v)) => draft.patient_name = Some(v),
            ("dob", FieldValue::Text(v)) => draft.dob = Some(v),
            ("addOns", FieldValue::List(v)) => draft.add_ons = v,
            (name, _) => {
                return Err(UpstreamError::Schema(format!("Unhandled field '{}'", name)));
            }
        }
    }

    Ok(draft)
}

enum FieldValue {
    Text(String),
    List(BTreeSet<String>),
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, UpstreamError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(UpstreamError::Schema("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let end = if lines[lines.len() - 1].trim() == "```" {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn expect_string(name: &str, value: &Value) -> Result<String, UpstreamError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::Schema(format!("Field '{}' must be a string", name)))
}

/// Accept an array of strings, or a comma-separated string
fn expect_string_list(name: &str, value: &Value) -> Result<BTreeSet<String>, UpstreamError> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .map(|item| expect_string(name, item))
            .collect::<Result<_, _>>()?,
        Value::String(joined) => joined.split(',').map(str::to_string).collect(),
        _ => {
            return Err(UpstreamError::Schema(format!(
                "Field '{}' must be an array of strings",
                name
            )))
        }
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect())
}

/// Reformat a model-reported flow rate as `"<number> L"`
///
/// A bare number gains the unit; text without a number is dropped.
fn normalize_liters(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.parse::<f64>().is_ok() {
        return Some(format!("{} L", trimmed));
    }
    rules::liters(trimmed)
}
