//! Engine selection and invocation.

use crate::config::settings::HostConfig;
use crate::config::types::{EngineType, ExitCode, HostError, Result};
use crate::core::slots::RuntimeSlots;
use crate::engines::registry::EngineRegistry;
use crate::observability::audit::InvocationRecord;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

static DEFAULT_DISPATCHER: OnceLock<std::result::Result<Arc<Dispatcher>, String>> = OnceLock::new();

/// Outcome of one dispatch together with its audit record.
#[derive(Debug)]
pub struct Dispatched {
    pub result: Result<ExitCode>,
    pub record: InvocationRecord,
}

/// Maps an engine type to its adapter and runs it under the runtime's slot.
#[derive(Debug)]
pub struct Dispatcher {
    registry: EngineRegistry,
    slots: Arc<RuntimeSlots>,
}

impl Dispatcher {
    /// Dispatcher sharing the process-wide runtime slots.
    pub fn new(registry: EngineRegistry) -> Self {
        Self::with_slots(registry, RuntimeSlots::global())
    }

    /// Dispatcher with its own slots; single-flight then only holds among
    /// dispatchers sharing `slots`.
    pub fn with_slots(registry: EngineRegistry, slots: Arc<RuntimeSlots>) -> Self {
        Self { registry, slots }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        Self::new(EngineRegistry::from_config(config))
    }

    /// Process default, built once from `HostConfig::load_default`.
    ///
    /// A configuration that failed to load is reported on every call.
    pub fn global() -> Result<Arc<Dispatcher>> {
        DEFAULT_DISPATCHER
            .get_or_init(|| {
                HostConfig::load_default()
                    .map(|config| Arc::new(Dispatcher::from_config(&config)))
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(HostError::Config)
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn slots(&self) -> &RuntimeSlots {
        &self.slots
    }

    /// Run `program` with `engine`, rooted at `workdir`.
    pub fn dispatch(&self, engine: EngineType, program: &Path, workdir: &Path) -> Dispatched {
        let started_at = Utc::now();
        let clock = Instant::now();
        let program = absolute(program);
        let workdir = absolute(workdir);
        let workdir = workdir.as_path();

        log::info!(
            "Executing {} with {} in {}",
            program.display(),
            engine,
            workdir.display()
        );

        let result = self.run(engine, &program, workdir);
        let record = InvocationRecord::new(engine, &program, workdir, started_at, clock.elapsed(), &result);
        record.emit();

        match &result {
            Ok(exit) => log::info!("{} exited with {} after {}ms", engine, exit, record.duration_ms),
            Err(e) => log::warn!("{} invocation failed: {}", engine, e),
        }

        Dispatched { result, record }
    }

    fn run(&self, engine: EngineType, program: &Path, workdir: &Path) -> Result<ExitCode> {
        let adapter = self.registry.adapter_for(engine, workdir)?;
        log::debug!("Selected {:?} adapter for {}", engine.family(), engine);

        let _flight = self.slots.acquire(engine)?;
        adapter.execute(program)
    }
}

/// Relative programs and workdirs are taken relative to the host's cwd.
/// The runtime runs with the workdir as its cwd and also receives it as a
/// module root, so a relative workdir would resolve twice.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            log::warn!("Cannot absolutize {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}
