use crate::config::settings::EngineSettings;
use crate::config::types::EngineType;
use crate::engines::adapter::{EngineAdapter, Invocation};
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "java";

#[derive(Debug, Clone)]
pub struct JavaAdapter {
    workdir: PathBuf,
    settings: EngineSettings,
}

impl JavaAdapter {
    pub fn new(workdir: &Path, settings: EngineSettings) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            settings,
        }
    }
}

impl EngineAdapter for JavaAdapter {
    fn engine(&self) -> EngineType {
        EngineType::Java
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Single-file source launch (`java Main.java`) with the workdir as classpath.
    fn invocation(&self, program: &Path) -> Invocation {
        Invocation::from_settings(&self.settings, EXECUTABLE)
            .arg("-Dfile.encoding=UTF-8")
            .arg("-cp")
            .arg(&self.workdir)
            .arg(program)
    }
}
