//! Tracing/logging setup shared by binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{LogFormat, init};
