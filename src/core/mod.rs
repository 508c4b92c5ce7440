//! Language-agnostic execution core.
//!
//! Core owns the context lifecycle, engine dispatch and process-wide runtime
//! slots. Language-specific launch logic lives in engine adapters.

pub mod context;
pub mod dispatcher;
pub mod slots;
