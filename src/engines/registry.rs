use crate::config::settings::HostConfig;
use crate::config::types::{EngineType, HostError, Result};
use crate::engines::adapter::EngineAdapter;
use crate::engines::builtin_adapter;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Builds an adapter for one invocation from its workdir.
pub type AdapterFactory = Arc<dyn Fn(&Path) -> Box<dyn EngineAdapter> + Send + Sync>;

/// Engine type to adapter factory table.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    factories: HashMap<EngineType, AdapterFactory>,
}

impl EngineRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in adapters for every engine the configuration leaves enabled.
    pub fn from_config(config: &HostConfig) -> Self {
        let mut registry = Self::empty();
        for engine in EngineType::ALL {
            let settings = config.engine(engine);
            if !settings.enabled {
                log::info!("Engine {} disabled by configuration", engine);
                continue;
            }
            registry.register(engine, move |workdir: &Path| {
                builtin_adapter(engine, workdir, settings.clone())
            });
        }
        registry
    }

    pub fn register<F>(&mut self, engine: EngineType, factory: F)
    where
        F: Fn(&Path) -> Box<dyn EngineAdapter> + Send + Sync + 'static,
    {
        self.factories.insert(engine, Arc::new(factory));
    }

    pub fn unregister(&mut self, engine: EngineType) -> bool {
        self.factories.remove(&engine).is_some()
    }

    pub fn supports(&self, engine: EngineType) -> bool {
        self.factories.contains_key(&engine)
    }

    pub fn engines(&self) -> Vec<EngineType> {
        EngineType::ALL
            .into_iter()
            .filter(|engine| self.supports(*engine))
            .collect()
    }

    pub fn adapter_for(&self, engine: EngineType, workdir: &Path) -> Result<Box<dyn EngineAdapter>> {
        let factory = self
            .factories
            .get(&engine)
            .ok_or(HostError::UnsupportedEngine(engine))?;
        Ok(factory(workdir))
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.engines())
            .finish()
    }
}
