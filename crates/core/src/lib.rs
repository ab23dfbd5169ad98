//! `ledgerbook-core`: shared building blocks for the bookkeeping engines.
//!
//! This crate contains **pure domain** primitives (no IO, no persistence):
//! identifiers, the domain error model, and the decimal/ordering helpers both
//! compute engines rely on.

pub mod error;
pub mod id;
pub mod numeric;
pub mod ordering;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{AccountId, ProductId};
pub use numeric::{checked, ensure_non_negative, round_display};
pub use ordering::{Timestamped, ensure_chronological, sort_chronologically};
pub use value_object::ValueObject;

/// Re-exported so downstream crates agree on a single decimal type.
pub use rust_decimal::Decimal;
