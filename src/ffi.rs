//! C ABI over `ExecutionContext`.
//!
//! Handles are opaque `ExecutionContext` pointers created by `polyhost_prep`
//! and released by `polyhost_free`. `polyhost_exec` returns the runtime's
//! exit code, or one of the negative `POLYHOST_ERR_*` values.

use crate::config::types::EngineType;
use crate::core::context::ExecutionContext;
use std::ffi::{c_char, c_int, CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

pub const POLYHOST_ENGINE_JAVASCRIPT: u32 = EngineType::Javascript as u32;
pub const POLYHOST_ENGINE_TYPESCRIPT: u32 = EngineType::Typescript as u32;
pub const POLYHOST_ENGINE_PYTHON: u32 = EngineType::Python as u32;
pub const POLYHOST_ENGINE_RUBY: u32 = EngineType::Ruby as u32;
pub const POLYHOST_ENGINE_LUA: u32 = EngineType::Lua as u32;
pub const POLYHOST_ENGINE_JAVA: u32 = EngineType::Java as u32;
pub const POLYHOST_ENGINE_CSHARP: u32 = EngineType::CSharp as u32;
pub const POLYHOST_ENGINE_GO: u32 = EngineType::Go as u32;

pub const POLYHOST_OK: c_int = 0;
pub const POLYHOST_ERR_INVALID_STATE: c_int = -1;
pub const POLYHOST_ERR_UNSUPPORTED_ENGINE: c_int = -2;
pub const POLYHOST_ERR_ENGINE_START: c_int = -3;
pub const POLYHOST_ERR_ENVIRONMENT: c_int = -4;
pub const POLYHOST_ERR_OTHER: c_int = -5;

/// Allocate a context; null for an engine id outside the closed set.
#[no_mangle]
pub extern "C" fn polyhost_prep(engine: u32) -> *mut ExecutionContext {
    match EngineType::from_raw(engine) {
        Some(engine) => Box::into_raw(Box::new(ExecutionContext::new(engine))),
        None => {
            log::error!("polyhost_prep: unknown engine id {}", engine);
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `context` must come from `polyhost_prep` and not be freed; `path` must be
/// null or a NUL-terminated string.
unsafe fn with_path(
    context: *const ExecutionContext,
    path: *const c_char,
    apply: impl FnOnce(&ExecutionContext, &Path),
) -> c_int {
    if context.is_null() || path.is_null() {
        return POLYHOST_ERR_INVALID_STATE;
    }
    let bytes = CStr::from_ptr(path).to_bytes();
    apply(&*context, Path::new(OsStr::from_bytes(bytes)));
    POLYHOST_OK
}

/// # Safety
/// `context` must come from `polyhost_prep` and not yet be freed. `program`
/// must be null or a NUL-terminated string; it is copied.
#[no_mangle]
pub unsafe extern "C" fn polyhost_set_program(
    context: *const ExecutionContext,
    program: *const c_char,
) -> c_int {
    with_path(context, program, |ctx, path| {
        ctx.set_program(path);
    })
}

/// # Safety
/// `context` must come from `polyhost_prep` and not yet be freed. `workdir`
/// must be null or a NUL-terminated string; it is copied.
#[no_mangle]
pub unsafe extern "C" fn polyhost_set_workdir(
    context: *const ExecutionContext,
    workdir: *const c_char,
) -> c_int {
    with_path(context, workdir, |ctx, path| {
        ctx.set_workdir(path);
    })
}

/// # Safety
/// `context` must come from `polyhost_prep` and not yet be freed.
#[no_mangle]
pub unsafe extern "C" fn polyhost_exec(context: *const ExecutionContext) -> c_int {
    if context.is_null() {
        return POLYHOST_ERR_INVALID_STATE;
    }
    let context = &*context;
    match catch_unwind(AssertUnwindSafe(|| context.exec())) {
        Ok(Ok(exit)) => exit.code(),
        Ok(Err(e)) => {
            log::error!("polyhost_exec: {}", e);
            e.status_code()
        }
        Err(_) => {
            log::error!("polyhost_exec: panic during {} invocation", context.engine_type());
            POLYHOST_ERR_OTHER
        }
    }
}

/// # Safety
/// `context` must be null or come from `polyhost_prep`; it is invalid afterwards.
#[no_mangle]
pub unsafe extern "C" fn polyhost_free(context: *mut ExecutionContext) {
    if !context.is_null() {
        drop(Box::from_raw(context));
    }
}
