//! LLM prompt engineering for order extraction

use crate::schema::{FieldKind, OrderSchema};

/// Builds the system instruction for model-based extraction
///
/// The note itself is sent separately as the user content.
pub struct PromptBuilder {
    schema: OrderSchema,
}

impl PromptBuilder {
    /// Create a new prompt builder for a schema
    pub fn new(schema: OrderSchema) -> Self {
        Self { schema }
    }

    /// Build the complete system instruction
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Output contract: {}\n", self.schema.version()));
        prompt.push_str("Fields:\n");
        for field in self.schema.fields() {
            let shape = match field.kind {
                FieldKind::Text => "string",
                FieldKind::TextList => "array of strings",
            };
            prompt.push_str(&format!("- {} ({}): {}\n", field.name, shape, field.description));
        }
        prompt.push('\n');

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You extract Durable Medical Equipment (DME) orders from physician notes.
Read the note and fill in every field below using only information stated in the note.

Rules:
- Do not guess. Use an empty string for any field the note does not state.
- Copy names, dates and diagnoses exactly as written.
- Device-specific fields apply only to their device: mask type, add-ons and qualifier to CPAP; liters and usage to oxygen.
- Report one device per note."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format: a single JSON object containing exactly the fields above, no others.

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
