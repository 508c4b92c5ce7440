use crate::config::settings::EngineSettings;
use crate::config::types::{EngineType, ExitCode, HostError, Result};
use crate::utils::env_guard;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

/// Runtime launch line for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub executable: PathBuf,
    pub args: Vec<OsString>,
    /// Variables set on the runtime child only
    pub env: Vec<(String, OsString)>,
}

impl Invocation {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Start from configured executable, launcher args and child env.
    pub fn from_settings(settings: &EngineSettings, default_executable: &str) -> Self {
        let mut invocation = Self::new(settings.executable_or(default_executable));
        invocation
            .args
            .extend(settings.launcher_args.iter().map(OsString::from));
        invocation.env.extend(
            settings
                .env
                .iter()
                .map(|(k, v)| (k.clone(), OsString::from(v))),
        );
        invocation
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.env.push((key.to_string(), value.into()));
        self
    }

    fn command(&self, workdir: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .current_dir(workdir);

        #[cfg(target_os = "linux")]
        {
            use std::os::unix::process::CommandExt;

            // SAFETY: the closure only issues prctl(2) between fork and exec.
            unsafe {
                command.pre_exec(|| {
                    nix::sys::prctl::set_pdeathsig(nix::sys::signal::Signal::SIGKILL)
                        .map_err(std::io::Error::from)
                });
            }
        }

        command
    }
}

/// Engine adapter contract: constructed from a workdir, runs one program.
pub trait EngineAdapter: Send + Sync {
    fn engine(&self) -> EngineType;

    fn workdir(&self) -> &Path;

    fn invocation(&self, program: &Path) -> Invocation;

    fn execute(&self, program: &Path) -> Result<ExitCode> {
        run_invocation(self.engine(), self.workdir(), &self.invocation(program))
    }
}

/// Spawn the runtime in `workdir`, wait, and translate its status.
///
/// Failing to launch is `EngineStart`; any status from a launched runtime
/// is returned as an `ExitCode`.
pub fn run_invocation(engine: EngineType, workdir: &Path, invocation: &Invocation) -> Result<ExitCode> {
    let child = {
        let _shared = env_guard::spawn_lock();
        spawn_invocation(engine, workdir, invocation)?
    };
    wait_invocation(engine, child)
}

/// Spawn without taking the environment lock.
///
/// For callers that already hold it exclusively through an `EnvOverride`.
pub fn spawn_invocation(engine: EngineType, workdir: &Path, invocation: &Invocation) -> Result<Child> {
    if !workdir.is_dir() {
        return Err(HostError::EngineStart {
            engine,
            reason: format!("workdir {} is not a directory", workdir.display()),
        });
    }

    log::debug!(
        "Launching {} {:?} in {}",
        invocation.executable.display(),
        invocation.args,
        workdir.display()
    );

    invocation
        .command(workdir)
        .spawn()
        .map_err(|e| HostError::EngineStart {
            engine,
            reason: format!("failed to launch {}: {}", invocation.executable.display(), e),
        })
}

pub fn wait_invocation(engine: EngineType, mut child: Child) -> Result<ExitCode> {
    let status = child.wait()?;

    let exit = ExitCode::from_status(status);
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signo) = status.signal() {
            match nix::sys::signal::Signal::try_from(signo) {
                Ok(signal) => log::warn!("{} runtime terminated by {:?}", engine, signal),
                Err(_) => log::warn!("{} runtime terminated by signal {}", engine, signo),
            }
        }
    }
    Ok(exit)
}
