//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use dme_domain::NormalizedOrder;
use std::path::PathBuf;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// A successfully extracted note.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Note file
    pub path: PathBuf,
    /// Extracted order
    pub order: NormalizedOrder,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format extracted orders.
    pub fn format_orders(&self, orders: &[Extracted]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_orders_json(orders),
            OutputFormat::Table => Ok(self.format_orders_table(orders)),
        }
    }

    /// Records only, as a JSON array.
    fn format_orders_json(&self, orders: &[Extracted]) -> Result<String> {
        let records: Vec<&NormalizedOrder> = orders.iter().map(|e| &e.order).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Format orders as a table.
    fn format_orders_table(&self, orders: &[Extracted]) -> String {
        if orders.is_empty() {
            return self.colorize("No orders extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Note", "Device", "Ordering Provider", "Details", "Patient"]);

        for extracted in orders {
            let order = &extracted.order;
            let note = extracted
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| extracted.path.display().to_string());
            builder.push_record([
                note,
                order.device().to_string(),
                order.ordering_provider().to_string(),
                details(order),
                patient(order),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Device-specific fields and diagnosis, one per line
fn details(order: &NormalizedOrder) -> String {
    let mut lines = Vec::new();
    if let Some(mask) = order.mask_type() {
        lines.push(format!("mask: {}", mask));
    }
    if !order.add_ons().is_empty() {
        let add_ons: Vec<&str> = order.add_ons().iter().map(String::as_str).collect();
        lines.push(format!("add-ons: {}", add_ons.join(", ")));
    }
    if let Some(qualifier) = order.qualifier() {
        lines.push(format!("qualifier: {}", qualifier));
    }
    if let Some(liters) = order.liters() {
        lines.push(format!("flow: {}", liters));
    }
    if let Some(usage) = order.usage() {
        lines.push(format!("usage: {}", usage));
    }
    if let Some(diagnosis) = order.diagnosis() {
        lines.push(format!("diagnosis: {}", diagnosis));
    }
    lines.join("\n")
}

fn patient(order: &NormalizedOrder) -> String {
    match (order.patient_name(), order.dob()) {
        (Some(name), Some(dob)) => format!("{} ({})", name, dob),
        (Some(name), None) => name.to_string(),
        (None, Some(dob)) => format!("DOB {}", dob),
        (None, None) => String::new(),
    }
}
