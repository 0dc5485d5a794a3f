//! Schema command implementation.

use crate::cli::SchemaArgs;
use crate::error::Result;
use dme_extractor::{OrderSchema, SCHEMA_VERSION};

/// Execute the schema command.
pub fn execute_schema(args: SchemaArgs) -> Result<()> {
    println!("{}", render_schema(&args)?);
    Ok(())
}

/// The versioned output contract as pretty JSON.
fn render_schema(args: &SchemaArgs) -> Result<String> {
    let schema = OrderSchema::new(!args.no_cpap_fields);
    let document = serde_json::json!({
        "version": SCHEMA_VERSION,
        "schema": schema.to_json_schema(),
    });
    Ok(serde_json::to_string_pretty(&document)?)
}
