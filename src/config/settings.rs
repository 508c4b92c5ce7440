/// Host configuration loading from polyhost.json
use crate::config::types::{EngineType, HostError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "POLYHOST_CONFIG";

/// Configuration file looked up under the runtime root.
pub const CONFIG_FILE_NAME: &str = "polyhost.json";

fn default_enabled() -> bool {
    true
}

/// Per-engine launch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Runtime executable; the adapter's default when unset
    #[serde(default)]
    pub executable: Option<PathBuf>,
    /// Arguments placed directly after the executable
    #[serde(default)]
    pub launcher_args: Vec<String>,
    /// Extra environment for the runtime child only
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Disabled engines are not registered with the dispatcher
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            executable: None,
            launcher_args: Vec::new(),
            env: BTreeMap::new(),
            enabled: true,
        }
    }
}

impl EngineSettings {
    /// Settings that launch through `executable`, for wrappers and tests.
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(executable.into()),
            ..Self::default()
        }
    }

    pub fn executable_or<'a>(&'a self, default: &'a str) -> &'a Path {
        self.executable.as_deref().unwrap_or_else(|| Path::new(default))
    }
}

/// Full polyhost.json structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub engines: HashMap<EngineType, EngineSettings>,
}

impl HostConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HostError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| HostError::Config(format!("Failed to parse config JSON: {}", e)))
    }

    /// Load from `POLYHOST_CONFIG`, else `<runtime root>/polyhost.json` when
    /// present, else defaults.
    pub fn load_default() -> Result<Self> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            log::debug!("Loading host config from {}", Path::new(&explicit).display());
            return Self::load_from_file(explicit);
        }

        let candidate = crate::runtime::root::resolve(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Loading host config from {}", candidate.display());
            return Self::load_from_file(candidate);
        }

        log::debug!("No host config found, using defaults");
        Ok(Self::default())
    }

    /// Settings for an engine, defaults when the file does not mention it.
    pub fn engine(&self, engine: EngineType) -> EngineSettings {
        self.engines.get(&engine).cloned().unwrap_or_default()
    }

    pub fn set_engine(&mut self, engine: EngineType, settings: EngineSettings) {
        self.engines.insert(engine, settings);
    }
}
