use crate::config::settings::EngineSettings;
use crate::config::types::{EngineType, ExitCode, Result};
use crate::engines::adapter::{spawn_invocation, wait_invocation, EngineAdapter, Invocation};
use crate::utils::env_guard::EnvOverride;
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "node";

/// Module search variable scoped to the workdir for each invocation.
pub const NODE_PATH_ENV: &str = "NODE_PATH";

/// Require hook registered ahead of TypeScript entry points.
pub const TS_TRANSPILE_HOOK: &str = "ts-node/register/transpile-only";

/// Flags shared by both flavors.
pub const NODE_FLAGS: [&str; 7] = [
    "--experimental-modules",
    "--experimental-wasi-unstable-preview1",
    "--no-global-search-paths",
    "--no-experimental-fetch",
    "--no-deprecation",
    "--no-warnings",
    "--no-addons",
];

#[derive(Debug, Clone)]
pub struct NodeAdapter {
    engine: EngineType,
    workdir: PathBuf,
    settings: EngineSettings,
}

impl NodeAdapter {
    /// `engine` selects the flavor; anything but TypeScript runs plain JavaScript.
    pub fn new(engine: EngineType, workdir: &Path, settings: EngineSettings) -> Self {
        Self {
            engine,
            workdir: workdir.to_path_buf(),
            settings,
        }
    }

    fn transpiles(&self) -> bool {
        self.engine == EngineType::Typescript
    }
}

impl EngineAdapter for NodeAdapter {
    fn engine(&self) -> EngineType {
        self.engine
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn invocation(&self, program: &Path) -> Invocation {
        let mut invocation = Invocation::from_settings(&self.settings, EXECUTABLE);
        for flag in NODE_FLAGS {
            invocation = invocation.arg(flag);
        }
        if self.transpiles() {
            invocation = invocation.arg("--require").arg(TS_TRANSPILE_HOOK);
        }
        invocation.arg(program)
    }

    /// Spawns with `NODE_PATH` set to the workdir in the host environment.
    /// The variable is restored once the child has started, before waiting,
    /// and no other runtime can spawn while it is overridden.
    fn execute(&self, program: &Path) -> Result<ExitCode> {
        let invocation = self.invocation(program);
        let guard = EnvOverride::set(NODE_PATH_ENV, &self.workdir)?;
        let spawned = spawn_invocation(self.engine, &self.workdir, &invocation);
        let restore = guard.restore();

        let result = spawned.and_then(|child| wait_invocation(self.engine, child));
        settle(result, restore)
    }
}

/// A failed restore is the error for a successful run; a failed run keeps
/// its own error and the restore failure is only logged.
fn settle(result: Result<ExitCode>, restore: Result<()>) -> Result<ExitCode> {
    match (result, restore) {
        (result, Ok(())) => result,
        (Ok(_), Err(restore)) => Err(restore),
        (Err(e), Err(restore)) => {
            log::error!("{}", restore);
            Err(e)
        }
    }
}
