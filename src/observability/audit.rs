/// Structured invocation records
///
/// One record per dispatch, emitted as a JSON line on the `polyhost::audit`
/// log target so it can be routed separately from diagnostic logging.
use crate::config::types::{EngineType, ErrorKind, ExitCode, Result, RuntimeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

pub const AUDIT_TARGET: &str = "polyhost::audit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// The runtime ran and exited with this code
    Exited { code: i32 },
    /// The host could not run the program
    Failed { kind: ErrorKind, message: String },
}

impl InvocationOutcome {
    pub fn from_result(result: &Result<ExitCode>) -> Self {
        match result {
            Ok(exit) => Self::Exited { code: exit.code() },
            Err(e) => Self::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub id: Uuid,
    pub engine: EngineType,
    pub runtime: RuntimeKind,
    pub program: PathBuf,
    pub workdir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub outcome: InvocationOutcome,
}

impl InvocationRecord {
    pub fn new(
        engine: EngineType,
        program: &Path,
        workdir: &Path,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        result: &Result<ExitCode>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine,
            runtime: engine.runtime(),
            program: program.to_path_buf(),
            workdir: workdir.to_path_buf(),
            started_at,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            outcome: InvocationOutcome::from_result(result),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data fields; serialization does not fail in practice.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"id\":\"{}\"}}", self.id))
    }

    pub fn emit(&self) {
        match &self.outcome {
            InvocationOutcome::Exited { .. } => log::info!(target: AUDIT_TARGET, "{}", self.to_json()),
            InvocationOutcome::Failed { .. } => log::warn!(target: AUDIT_TARGET, "{}", self.to_json()),
        }
    }
}
