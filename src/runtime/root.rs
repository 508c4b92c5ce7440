//! Runtime root resolution.
//!
//! The root is computed once per process and never re-read, so changes to
//! `POLYHOST_ROOT` after first access have no effect.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable naming the runtime root.
pub const ROOT_ENV: &str = "POLYHOST_ROOT";

static RUNTIME_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// Root resolution policy: non-empty env value, then cwd, then `"."`.
pub fn resolve_root_from(env_value: Option<OsString>, cwd: std::io::Result<PathBuf>) -> PathBuf {
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return PathBuf::from(value);
    }
    match cwd {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Cannot read current directory for runtime root: {}", e);
            PathBuf::from(".")
        }
    }
}

/// Process-wide runtime root, resolved on first call.
pub fn runtime_root() -> &'static Path {
    RUNTIME_ROOT.get_or_init(|| {
        let root = resolve_root_from(std::env::var_os(ROOT_ENV), std::env::current_dir());
        log::debug!("Runtime root resolved to {}", root.display());
        root
    })
}

/// `<root>/<relative>`; no normalization and no existence check.
pub fn resolve(relative: impl AsRef<Path>) -> PathBuf {
    join_root(runtime_root(), relative.as_ref())
}

fn join_root(root: &Path, relative: &Path) -> PathBuf {
    // Plain concatenation: an absolute fragment must not replace the root.
    let mut joined = root.as_os_str().to_owned();
    joined.push(std::path::MAIN_SEPARATOR_STR);
    joined.push(relative.as_os_str());
    PathBuf::from(joined)
}
