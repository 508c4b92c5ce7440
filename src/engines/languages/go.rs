use crate::config::settings::EngineSettings;
use crate::config::types::EngineType;
use crate::engines::adapter::{EngineAdapter, Invocation};
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "go";

#[derive(Debug, Clone)]
pub struct GoAdapter {
    workdir: PathBuf,
    settings: EngineSettings,
}

impl GoAdapter {
    pub fn new(workdir: &Path, settings: EngineSettings) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            settings,
        }
    }
}

impl EngineAdapter for GoAdapter {
    fn engine(&self) -> EngineType {
        EngineType::Go
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    // The workdir is the cwd, so `go run` resolves go.mod from there.
    fn invocation(&self, program: &Path) -> Invocation {
        Invocation::from_settings(&self.settings, EXECUTABLE)
            .arg("run")
            .arg(program)
    }
}
