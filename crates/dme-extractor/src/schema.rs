//! Versioned output schema shared by the prompt builder and the parser
//!
//! The prompt describes exactly the fields listed here and the parser
//! accepts exactly these fields, so a change to [`FIELDS`] changes both
//! sides at once. Bump [`SCHEMA_VERSION`] whenever the field list or a
//! field's meaning changes.

use serde_json::{json, Map, Value};

/// Version of the order output contract
pub const SCHEMA_VERSION: &str = "dme-order/1";

/// Name sent to providers that require a named schema
pub const SCHEMA_NAME: &str = "normalized_order";

/// JSON shape of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single string
    Text,
    /// An array of strings
    TextList,
}

/// One field of the order contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    /// Wire name
    pub name: &'static str,
    /// Value shape
    pub kind: FieldKind,
    /// Instruction given to the model
    pub description: &'static str,
    /// Only requested when CPAP fields are enabled
    pub cpap_only: bool,
}

const fn text(name: &'static str, description: &'static str, cpap_only: bool) -> SchemaField {
    SchemaField {
        name,
        kind: FieldKind::Text,
        description,
        cpap_only,
    }
}

/// Every field of the contract, in prompt order
pub const FIELDS: &[SchemaField] = &[
    text(
        "device",
        "The equipment ordered: \"CPAP\", \"Oxygen Tank\", \"Wheelchair\", or another device name. \"Unknown\" if none is ordered.",
        false,
    ),
    text(
        "liters",
        "Oxygen flow rate as \"<number> L\", exactly as written. Empty if not an oxygen order.",
        false,
    ),
    text(
        "usage",
        "Oxygen usage: \"sleep\", \"exertion\", or \"sleep and exertion\". Empty if not stated.",
        false,
    ),
    text("diagnosis", "The diagnosis as written in the note.", false),
    text(
        "orderingProvider",
        "The ordering physician's name, e.g. \"Dr. Cameron\".",
        false,
    ),
    text("patientName", "The patient's full name.", false),
    text("dob", "The patient's date of birth, exactly as written.", false),
    text(
        "maskType",
        "CPAP mask type, e.g. \"full face\". Empty if not a CPAP order.",
        true,
    ),
    SchemaField {
        name: "addOns",
        kind: FieldKind::TextList,
        description: "CPAP accessories, e.g. [\"humidifier\"]. Empty list if none.",
        cpap_only: true,
    },
    text(
        "qualifier",
        "CPAP qualifying criterion, e.g. \"AHI > 20\". Empty if not stated.",
        true,
    ),
];

/// The field set requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSchema {
    include_cpap_fields: bool,
}

impl OrderSchema {
    /// Create a schema, optionally including the CPAP-only fields
    pub fn new(include_cpap_fields: bool) -> Self {
        Self { include_cpap_fields }
    }

    /// Contract version
    pub fn version(&self) -> &'static str {
        SCHEMA_VERSION
    }

    /// Fields in this schema, in prompt order
    pub fn fields(&self) -> impl Iterator<Item = &'static SchemaField> + '_ {
        FIELDS
            .iter()
            .filter(move |f| self.include_cpap_fields || !f.cpap_only)
    }

    /// Look up a field by name, ignoring ASCII case
    pub fn field(&self, name: &str) -> Option<&'static SchemaField> {
        self.fields().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// JSON Schema document: all fields required, no additional properties
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields() {
            let property = match field.kind {
                FieldKind::Text => json!({
                    "type": "string",
                    "description": field.description,
                }),
                FieldKind::TextList => json!({
                    "type": "array",
                    "items": {"type": "string"},
                    "description": field.description,
                }),
            };
            properties.insert(field.name.to_string(), property);
        }

        let required: Vec<&str> = self.fields().map(|f| f.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

impl Default for OrderSchema {
    fn default() -> Self {
        Self::new(true)
    }
}
