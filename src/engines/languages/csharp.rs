use crate::config::settings::EngineSettings;
use crate::config::types::EngineType;
use crate::engines::adapter::{EngineAdapter, Invocation};
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "dotnet";

#[derive(Debug, Clone)]
pub struct CSharpAdapter {
    workdir: PathBuf,
    settings: EngineSettings,
}

impl CSharpAdapter {
    pub fn new(workdir: &Path, settings: EngineSettings) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            settings,
        }
    }
}

fn is_assembly(program: &Path) -> bool {
    program
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("dll"))
        .unwrap_or(false)
}

impl EngineAdapter for CSharpAdapter {
    fn engine(&self) -> EngineType {
        EngineType::CSharp
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Compiled assemblies run directly; sources go through `dotnet script`.
    fn invocation(&self, program: &Path) -> Invocation {
        let invocation = Invocation::from_settings(&self.settings, EXECUTABLE);
        if is_assembly(program) {
            invocation.arg(program)
        } else {
            invocation.arg("script").arg(program)
        }
    }
}
