//! Observability
//!
//! Structured per-invocation audit records.

pub mod audit;
