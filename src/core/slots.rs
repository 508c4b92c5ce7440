//! Process-wide runtime slots.
//!
//! Each runtime kind has one slot: a flight lock serializing invocations of
//! that runtime across every context, and a state machine
//! `Uninitialized -> Running -> Uninitialized`, with `ShutDown` terminal.
//! JavaScript and TypeScript share the Node slot, which also bounds the
//! `NODE_PATH` override to one window at a time.

use crate::config::types::{EngineType, HostError, Result, RuntimeKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeState {
    Uninitialized,
    Running,
    ShutDown,
}

#[derive(Debug)]
struct RuntimeSlot {
    flight: Mutex<()>,
    state: Mutex<RuntimeState>,
}

impl RuntimeSlot {
    fn new() -> Self {
        Self {
            flight: Mutex::new(()),
            state: Mutex::new(RuntimeState::Uninitialized),
        }
    }

    // Slot data stays consistent across a panicking holder, so poison is ignored.
    fn state(&self) -> MutexGuard<'_, RuntimeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fly(&self) -> MutexGuard<'_, ()> {
        self.flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL_SLOTS: Lazy<Arc<RuntimeSlots>> = Lazy::new(|| Arc::new(RuntimeSlots::new()));

/// One slot per runtime kind
#[derive(Debug)]
pub struct RuntimeSlots {
    slots: HashMap<RuntimeKind, RuntimeSlot>,
}

impl Default for RuntimeSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeSlots {
    pub fn new() -> Self {
        Self {
            slots: RuntimeKind::ALL
                .into_iter()
                .map(|kind| (kind, RuntimeSlot::new()))
                .collect(),
        }
    }

    /// Slots shared by every dispatcher that does not bring its own.
    pub fn global() -> Arc<RuntimeSlots> {
        Arc::clone(&GLOBAL_SLOTS)
    }

    fn slot(&self, kind: RuntimeKind) -> &RuntimeSlot {
        // Every kind is inserted by `new`.
        &self.slots[&kind]
    }

    pub fn state(&self, kind: RuntimeKind) -> RuntimeState {
        *self.slot(kind).state()
    }

    /// Capability query: false once the runtime has been shut down.
    pub fn is_available(&self, kind: RuntimeKind) -> bool {
        self.state(kind) != RuntimeState::ShutDown
    }

    /// Wait for the runtime's flight lock and mark it running.
    ///
    /// A shut-down runtime fails fast with `EngineStart`, before and after
    /// waiting.
    pub fn acquire(&self, engine: EngineType) -> Result<FlightGuard<'_>> {
        let kind = engine.runtime();
        let slot = self.slot(kind);
        let shut_down = || HostError::EngineStart {
            engine,
            reason: format!("{:?} runtime has been shut down", kind),
        };

        if *slot.state() == RuntimeState::ShutDown {
            return Err(shut_down());
        }

        let flight = slot.fly();
        let mut state = slot.state();
        if *state == RuntimeState::ShutDown {
            return Err(shut_down());
        }
        *state = RuntimeState::Running;
        drop(state);

        log::debug!("{:?} runtime slot acquired for {}", kind, engine);
        Ok(FlightGuard {
            kind,
            slot,
            _flight: flight,
        })
    }

    /// Wait for any in-flight invocation, then refuse all further starts.
    pub fn shutdown(&self, kind: RuntimeKind) {
        let slot = self.slot(kind);
        let _flight = slot.fly();
        *slot.state() = RuntimeState::ShutDown;
        log::info!("{:?} runtime shut down", kind);
    }
}

/// Held for the duration of one runtime invocation
#[derive(Debug)]
pub struct FlightGuard<'a> {
    kind: RuntimeKind,
    slot: &'a RuntimeSlot,
    _flight: MutexGuard<'a, ()>,
}

impl FlightGuard<'_> {
    pub fn kind(&self) -> RuntimeKind {
        self.kind
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.slot.state();
        if *state == RuntimeState::Running {
            *state = RuntimeState::Uninitialized;
        }
    }
}
