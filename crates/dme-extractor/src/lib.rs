//! DME Order Extractor
//!
//! Turns free-text physician notes into structured Durable Medical Equipment
//! orders.
//!
//! # Overview
//!
//! Two interchangeable strategies produce the same [`NormalizedOrder`]:
//!
//! - **Rule-based**: deterministic keyword and pattern rules, no I/O
//! - **Model-based**: a text-completion service constrained to a versioned
//!   JSON schema, validated and normalized exactly like the rule-based output
//!
//! # Architecture
//!
//! ```text
//! Note text → OrderExtractor ─┬─ RuleBasedExtractor → rules ─────────────┐
//!                             └─ ModelExtractor → LLM → parser → schema ─┴→ OrderDraft → NormalizedOrder
//! ```
//!
//! # Failure policy
//!
//! The rule-based path only fails on empty input; everything else degrades
//! to `"Unknown"` or absent fields. The model-based path fails with
//! [`ExtractorError::Upstream`] rather than returning a default record.
//!
//! # Example Usage
//!
//! ```
//! use dme_extractor::{ExtractorConfig, OrderExtractor};
//!
//! # tokio_test::block_on(async {
//! let extractor = OrderExtractor::from_config(&ExtractorConfig::default()).unwrap();
//!
//! let order = extractor
//!     .extract("Patient requires a wheelchair for mobility. Ordered by Dr. House.")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(order.device().as_str(), "Wheelchair");
//! assert_eq!(order.ordering_provider(), "Dr. House");
//! # });
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod model;
mod parser;
mod prompt;
mod rule_based;
pub mod rules;
pub mod schema;


pub use config::{ExtractorConfig, ModelConfig, ProviderKind, Strategy};
pub use dme_domain::{Device, NormalizedOrder};
pub use error::{ErrorKind, ExtractorError, UpstreamError};
pub use extractor::OrderExtractor;
pub use model::ModelExtractor;
pub use rule_based::RuleBasedExtractor;
pub use schema::{OrderSchema, SCHEMA_VERSION};
