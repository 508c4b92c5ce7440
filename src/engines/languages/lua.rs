use crate::config::settings::EngineSettings;
use crate::config::types::EngineType;
use crate::engines::adapter::{EngineAdapter, Invocation};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "lua";

#[derive(Debug, Clone)]
pub struct LuaAdapter {
    workdir: PathBuf,
    settings: EngineSettings,
}

impl LuaAdapter {
    pub fn new(workdir: &Path, settings: EngineSettings) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            settings,
        }
    }

    /// `require` search templates rooted at the workdir, then Lua's defaults (`;;`).
    fn module_path(&self) -> OsString {
        let mut path = OsString::new();
        path.push(self.workdir.join("?.lua"));
        path.push(";");
        path.push(self.workdir.join("?").join("init.lua"));
        path.push(";;");
        path
    }
}

impl EngineAdapter for LuaAdapter {
    fn engine(&self) -> EngineType {
        EngineType::Lua
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn invocation(&self, program: &Path) -> Invocation {
        Invocation::from_settings(&self.settings, EXECUTABLE)
            .arg(program)
            .env("LUA_PATH", self.module_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lua_path_prefers_workdir_modules() {
        let adapter = LuaAdapter::new(Path::new("/w"), EngineSettings::default());
        let invocation = adapter.invocation(Path::new("main.lua"));
        assert_eq!(
            invocation.env,
            vec![("LUA_PATH".to_string(), OsString::from("/w/?.lua;/w/?/init.lua;;"))]
        );
    }
}
