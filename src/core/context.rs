//! Execution contexts.
//!
//! A context is the lock-guarded record of one execution request: a fixed
//! engine type plus the program and workdir set by the caller. It owns no
//! engine; adapters are built per `exec`.
//!
//! `exec` holds the context lock for the whole runtime invocation, so two
//! threads calling `exec` on one context never overlap. Contexts are not
//! synchronized against each other; invocations of the same runtime from
//! different contexts are serialized by the dispatcher's runtime slots.

use crate::config::types::{EngineType, ExitCode, HostError, Result};
use crate::core::dispatcher::{Dispatched, Dispatcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ContextState {
    program: Option<PathBuf>,
    workdir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ExecutionContext {
    engine: EngineType,
    dispatcher: Option<Arc<Dispatcher>>,
    state: Mutex<ContextState>,
}

impl ExecutionContext {
    /// Context dispatching through the process default dispatcher.
    pub fn new(engine: EngineType) -> Self {
        Self {
            engine,
            dispatcher: None,
            state: Mutex::new(ContextState::default()),
        }
    }

    pub fn with_dispatcher(engine: EngineType, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            engine,
            dispatcher: Some(dispatcher),
            state: Mutex::new(ContextState::default()),
        }
    }

    pub fn engine_type(&self) -> EngineType {
        self.engine
    }

    // A panicking runtime cannot leave the two paths half-written.
    fn lock(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn program(&self) -> Option<PathBuf> {
        self.lock().program.clone()
    }

    pub fn workdir(&self) -> Option<PathBuf> {
        self.lock().workdir.clone()
    }

    /// Returns whether the stored value changed.
    pub fn set_program(&self, program: impl AsRef<Path>) -> bool {
        replace_if_changed(&mut self.lock().program, program.as_ref())
    }

    /// Returns whether the stored value changed.
    pub fn set_workdir(&self, workdir: impl AsRef<Path>) -> bool {
        replace_if_changed(&mut self.lock().workdir, workdir.as_ref())
    }

    /// Run the program and return the runtime's exit code.
    pub fn exec(&self) -> Result<ExitCode> {
        self.exec_recorded()?.result
    }

    /// Like `exec`, also returning the invocation's audit record.
    ///
    /// Fails before dispatch with `InvalidState` when program or workdir is
    /// unset.
    pub fn exec_recorded(&self) -> Result<Dispatched> {
        let state = self.lock();

        let program = state
            .program
            .as_deref()
            .ok_or_else(|| HostError::InvalidState("exec called before set_program".to_string()))?;
        let workdir = state
            .workdir
            .as_deref()
            .ok_or_else(|| HostError::InvalidState("exec called before set_workdir".to_string()))?;

        let dispatcher = match &self.dispatcher {
            Some(dispatcher) => Arc::clone(dispatcher),
            None => Dispatcher::global()?,
        };

        Ok(dispatcher.dispatch(self.engine, program, workdir))
    }
}

fn replace_if_changed(slot: &mut Option<PathBuf>, value: &Path) -> bool {
    if slot.as_deref() == Some(value) {
        log::trace!("Path unchanged: {}", value.display());
        return false;
    }
    *slot = Some(value.to_path_buf());
    true
}
