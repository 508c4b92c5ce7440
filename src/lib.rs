//! polyhost: A polyglot execution host
//! Runs test and build programs written for several language runtimes behind one
//! context API, with per-invocation workdir scoping.
//!
//! # Architecture
//!
//! ## Execution Core ([`core`])
//! - [`core::context`]: Lock-guarded execution contexts (engine, program, workdir)
//! - [`core::dispatcher`]: Engine selection and invocation
//! - [`core::slots`]: Process-wide single-flight runtime slots
//!
//! ## Engine Adapters ([`engines`])
//! - [`engines::adapter`]: Uniform `execute(program) -> exit code` contract
//! - [`engines::registry`]: Engine type to adapter factory table
//! - [`engines::languages`]: Node (JavaScript/TypeScript), Python, Ruby, Lua, Java, C#, Go
//!
//! ## Runtime Root ([`runtime`])
//! - [`runtime::root`]: `POLYHOST_ROOT` resolution, memoized per process
//!
//! ## Configuration ([`config`])
//! - [`config::types`]: Engine enumeration, exit codes, error taxonomy
//! - [`config::settings`]: `polyhost.json` engine settings
//!
//! ## Observability ([`observability`])
//! - [`observability::audit`]: Structured invocation records
//!
//! ## Utilities ([`utils`])
//! - [`utils::env_guard`]: Scoped process environment overrides
//!
//! ## Boundaries
//! - [`ffi`]: C ABI (`polyhost_prep` / `polyhost_exec` / `polyhost_free`)
//! - [`cli`]: `polyhost` binary wiring
//!
//! # Concurrency
//!
//! `exec` blocks until the runtime exits. One context serializes its own
//! calls; invocations of the same runtime across contexts are serialized by
//! its runtime slot. There is no cancellation and no timeout.

// Execution Core
pub mod core;

// Engine adapters (language-specific launch lines)
pub mod engines;

// Runtime root resolution
pub mod runtime;

// Configuration & shared types
pub mod config;

// Observability
pub mod observability;

// Utilities
pub mod utils;

// C ABI
pub mod ffi;

// CLI entrypoint wiring for the polyhost binary.
pub mod cli;

pub use crate::config::settings::{EngineSettings, HostConfig};
pub use crate::config::types::*;
pub use crate::core::context::ExecutionContext;
pub use crate::core::dispatcher::{Dispatched, Dispatcher};
pub use crate::engines::registry::EngineRegistry;
