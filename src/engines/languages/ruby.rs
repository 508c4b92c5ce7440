use crate::config::settings::EngineSettings;
use crate::config::types::EngineType;
use crate::engines::adapter::{EngineAdapter, Invocation};
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "ruby";

#[derive(Debug, Clone)]
pub struct RubyAdapter {
    workdir: PathBuf,
    settings: EngineSettings,
}

impl RubyAdapter {
    pub fn new(workdir: &Path, settings: EngineSettings) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            settings,
        }
    }
}

impl EngineAdapter for RubyAdapter {
    fn engine(&self) -> EngineType {
        EngineType::Ruby
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn invocation(&self, program: &Path) -> Invocation {
        Invocation::from_settings(&self.settings, EXECUTABLE)
            .arg("-I")
            .arg(&self.workdir)
            .arg(program)
    }
}
