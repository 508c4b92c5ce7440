//! Utilities
//!
//! Cross-cutting helpers for process environment handling.

pub mod env_guard;
