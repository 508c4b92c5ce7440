//! Configuration and shared types
//!
//! Engine enumeration, error taxonomy, and the JSON host configuration.

pub mod settings;
pub mod types;
