/// Scoped process environment overrides
///
/// An `EnvOverride` sets one variable and puts the previous value back when
/// it is dropped, including the "was absent" case. Values are read with
/// `var_os`, so arbitrarily long or non-UTF-8 values survive the round trip.
///
/// Children inherit the host environment at spawn. An override holds the
/// process-wide environment lock exclusively for its whole lifetime, and
/// spawns take it shared, so no child ever starts with an override in place
/// unless it was spawned by the override's owner.
use crate::config::types::{HostError, Result};
use std::env;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

static HOST_ENV: RwLock<()> = RwLock::new(());

/// Shared hold on the host environment, taken around child spawns.
///
/// Must not be taken by a thread that currently owns an `EnvOverride`.
pub fn spawn_lock() -> RwLockReadGuard<'static, ()> {
    HOST_ENV.read().unwrap_or_else(|e| e.into_inner())
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains('=') || key.contains('\0') {
        return Err(HostError::Environment(format!(
            "invalid environment variable name: {:?}",
            key
        )));
    }
    Ok(())
}

fn validate_value(key: &str, value: &OsStr) -> Result<()> {
    if value.as_bytes().contains(&0) {
        return Err(HostError::Environment(format!(
            "value for {} contains an interior NUL byte",
            key
        )));
    }
    Ok(())
}

/// Guard holding one overridden variable
#[derive(Debug)]
pub struct EnvOverride {
    key: String,
    saved: Option<OsString>,
    restored: bool,
    // Released after `drop` has restored the variable.
    _exclusive: RwLockWriteGuard<'static, ()>,
}

impl EnvOverride {
    /// Override `key` with `value`, remembering the prior value.
    ///
    /// Nothing is modified when validation fails. Blocks while any child is
    /// being spawned or another override is live.
    pub fn set(key: &str, value: impl AsRef<OsStr>) -> Result<Self> {
        let value = value.as_ref();
        validate_key(key)?;
        validate_value(key, value)?;

        let exclusive = HOST_ENV.write().unwrap_or_else(|e| e.into_inner());
        let saved = env::var_os(key);
        env::set_var(key, value);
        log::debug!(
            "Overrode {} (previously {})",
            key,
            if saved.is_some() { "set" } else { "unset" }
        );

        Ok(Self {
            key: key.to_string(),
            saved,
            restored: false,
            _exclusive: exclusive,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value the variable had before the override.
    pub fn saved(&self) -> Option<&OsStr> {
        self.saved.as_deref()
    }

    /// Restore now and report whether the environment matches the saved value.
    pub fn restore(mut self) -> Result<()> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        match &self.saved {
            Some(value) => env::set_var(&self.key, value),
            None => env::remove_var(&self.key),
        }

        if env::var_os(&self.key) != self.saved {
            return Err(HostError::Environment(format!(
                "{} does not match its saved value after restore",
                self.key
            )));
        }
        Ok(())
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        if let Err(e) = self.restore_inner() {
            log::error!("{}", e);
        }
    }
}
