//! Engine adapters.
//!
//! The dispatcher stays language-agnostic. Adapters define the launch line
//! and workdir scoping for each runtime.

pub mod adapter;
pub mod languages;
pub mod registry;

use crate::config::settings::EngineSettings;
use crate::config::types::EngineType;
use crate::engines::adapter::EngineAdapter;
use crate::engines::languages::{
    csharp::CSharpAdapter, go::GoAdapter, java::JavaAdapter, lua::LuaAdapter, node::NodeAdapter,
    python::PythonAdapter, ruby::RubyAdapter,
};
use std::path::Path;

/// Built-in adapter for `engine`, constructed with the invocation's workdir.
pub fn builtin_adapter(
    engine: EngineType,
    workdir: &Path,
    settings: EngineSettings,
) -> Box<dyn EngineAdapter> {
    match engine {
        EngineType::Javascript | EngineType::Typescript => {
            Box::new(NodeAdapter::new(engine, workdir, settings))
        }
        EngineType::Python => Box::new(PythonAdapter::new(workdir, settings)),
        EngineType::Ruby => Box::new(RubyAdapter::new(workdir, settings)),
        EngineType::Lua => Box::new(LuaAdapter::new(workdir, settings)),
        EngineType::Java => Box::new(JavaAdapter::new(workdir, settings)),
        EngineType::CSharp => Box::new(CSharpAdapter::new(workdir, settings)),
        EngineType::Go => Box::new(GoAdapter::new(workdir, settings)),
    }
}

/// Runtime executable used when the configuration names none.
pub fn default_executable(engine: EngineType) -> &'static str {
    use crate::engines::languages::{csharp, go, java, lua, node, python, ruby};

    match engine {
        EngineType::Javascript | EngineType::Typescript => node::EXECUTABLE,
        EngineType::Python => python::EXECUTABLE,
        EngineType::Ruby => ruby::EXECUTABLE,
        EngineType::Lua => lua::EXECUTABLE,
        EngineType::Java => java::EXECUTABLE,
        EngineType::CSharp => csharp::EXECUTABLE,
        EngineType::Go => go::EXECUTABLE,
    }
}

/// Argument that makes the runtime print its version and exit.
pub fn version_arg(engine: EngineType) -> &'static str {
    match engine {
        EngineType::Lua => "-v",
        EngineType::Java => "-version",
        EngineType::Go => "version",
        _ => "--version",
    }
}
