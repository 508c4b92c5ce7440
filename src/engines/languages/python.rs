use crate::config::settings::EngineSettings;
use crate::config::types::EngineType;
use crate::engines::adapter::{EngineAdapter, Invocation};
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "python3";

#[derive(Debug, Clone)]
pub struct PythonAdapter {
    workdir: PathBuf,
    settings: EngineSettings,
}

impl PythonAdapter {
    pub fn new(workdir: &Path, settings: EngineSettings) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            settings,
        }
    }
}

impl EngineAdapter for PythonAdapter {
    fn engine(&self) -> EngineType {
        EngineType::Python
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn invocation(&self, program: &Path) -> Invocation {
        // -B keeps bytecode caches out of the workdir.
        Invocation::from_settings(&self.settings, EXECUTABLE)
            .arg("-B")
            .arg(program)
            .env("PYTHONPATH", &self.workdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_python_invocation_scopes_import_path() {
        let adapter = PythonAdapter::new(Path::new("/w"), EngineSettings::default());
        let invocation = adapter.invocation(Path::new("main.py"));
        assert_eq!(invocation.executable, PathBuf::from("python3"));
        assert_eq!(invocation.args, vec![OsString::from("-B"), OsString::from("main.py")]);
        assert_eq!(invocation.env, vec![("PYTHONPATH".to_string(), OsString::from("/w"))]);
    }
}
