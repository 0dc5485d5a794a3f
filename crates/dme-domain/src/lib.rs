//! DME Domain Layer
//!
//! This crate contains the order model shared by every extraction strategy.
//! Its only external dependency is `serde`, because the serialized shape of a
//! [`NormalizedOrder`] is the contract with the downstream submission API.
//!
//! ## Key Concepts
//!
//! - **Device**: The kind of Durable Medical Equipment ordered
//! - **NormalizedOrder**: The canonical, immutable output of one extraction
//! - **OrderDraft**: Raw field values collected by a strategy, normalized
//!   into an order in a single step so every strategy obeys the same rules

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod device;
pub mod order;

// Re-exports for convenience
pub use device::Device;
pub use order::{NormalizedOrder, OrderDraft, UNKNOWN};
