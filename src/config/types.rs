/// Core types shared by the context, dispatcher and engine adapters
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Language engine requested by an execution context.
///
/// The set is closed. Discriminants are the engine ids used at the C boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum EngineType {
    Javascript = 0,
    Typescript = 1,
    Python = 2,
    Ruby = 3,
    Lua = 4,
    Java = 5,
    #[serde(rename = "csharp")]
    CSharp = 6,
    Go = 7,
}

impl EngineType {
    pub const ALL: [EngineType; 8] = [
        EngineType::Javascript,
        EngineType::Typescript,
        EngineType::Python,
        EngineType::Ruby,
        EngineType::Lua,
        EngineType::Java,
        EngineType::CSharp,
        EngineType::Go,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Lua => "lua",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Go => "go",
        }
    }

    /// Engine for a C-boundary id, `None` for ids outside the closed set.
    pub fn from_raw(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|engine| *engine as u32 == id)
    }

    pub fn family(self) -> EngineFamily {
        match self {
            Self::Javascript | Self::Typescript => EngineFamily::JsTsRuntime,
            Self::Lua | Self::Ruby => EngineFamily::ScriptingVm,
            Self::Python => EngineFamily::BytecodeVm,
            Self::Java => EngineFamily::Jvm,
            Self::CSharp => EngineFamily::Clr,
            Self::Go => EngineFamily::CompiledSystemsLang,
        }
    }

    /// Runtime backing this engine. JavaScript and TypeScript share Node.
    pub fn runtime(self) -> RuntimeKind {
        match self {
            Self::Javascript | Self::Typescript => RuntimeKind::Node,
            Self::Python => RuntimeKind::Python,
            Self::Ruby => RuntimeKind::Ruby,
            Self::Lua => RuntimeKind::Lua,
            Self::Java => RuntimeKind::Jvm,
            Self::CSharp => RuntimeKind::Dotnet,
            Self::Go => RuntimeKind::Go,
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineType {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" | "node" => Ok(Self::Javascript),
            "typescript" | "ts" => Ok(Self::Typescript),
            "python" | "py" => Ok(Self::Python),
            "ruby" | "rb" => Ok(Self::Ruby),
            "lua" => Ok(Self::Lua),
            "java" => Ok(Self::Java),
            "csharp" | "cs" | "c#" => Ok(Self::CSharp),
            "go" | "golang" => Ok(Self::Go),
            _ => Err(HostError::Config(format!("unknown engine: {s}"))),
        }
    }
}

/// Language family an engine belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineFamily {
    JsTsRuntime,
    ScriptingVm,
    BytecodeVm,
    Jvm,
    Clr,
    CompiledSystemsLang,
}

/// Process-wide runtime identity used for single-flight serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuntimeKind {
    Node,
    Python,
    Ruby,
    Lua,
    Jvm,
    Dotnet,
    Go,
}

impl RuntimeKind {
    pub const ALL: [RuntimeKind; 7] = [
        RuntimeKind::Node,
        RuntimeKind::Python,
        RuntimeKind::Ruby,
        RuntimeKind::Lua,
        RuntimeKind::Jvm,
        RuntimeKind::Dotnet,
        RuntimeKind::Go,
    ];
}

/// Exit status reported by a runtime that actually ran the program.
///
/// Zero is success, anything else is the runtime's own failure signal.
/// A runtime killed by signal `n` is reported as `128 + n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Translate a child wait status.
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        if let Some(code) = status.code() {
            return ExitCode(code);
        }
        match status.signal() {
            Some(signo) => ExitCode(128 + signo),
            None => ExitCode(1),
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse error class, one per `HostError` variant family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidState,
    UnsupportedEngine,
    EngineStart,
    Environment,
    Other,
}

/// Error types for the execution host
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unsupported engine: no adapter registered for {0}")]
    UnsupportedEngine(EngineType),

    #[error("Engine start failure ({engine}): {reason}")]
    EngineStart { engine: EngineType, reason: String },

    #[error("Environment isolation error: {0}")]
    Environment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid path {path}: {reason}")]
    Path { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::UnsupportedEngine(_) => ErrorKind::UnsupportedEngine,
            Self::EngineStart { .. } => ErrorKind::EngineStart,
            Self::Environment(_) => ErrorKind::Environment,
            Self::Config(_) | Self::Path { .. } | Self::Io(_) => ErrorKind::Other,
        }
    }

    /// Negative status used where errors and exit codes share one integer.
    pub fn status_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidState => -1,
            ErrorKind::UnsupportedEngine => -2,
            ErrorKind::EngineStart => -3,
            ErrorKind::Environment => -4,
            ErrorKind::Other => -5,
        }
    }
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, HostError>;
