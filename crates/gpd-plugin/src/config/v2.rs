//! Reference read-write config.
//!
//! Deliberately a single slot, not a keyed map: once anything is set, every
//! key reads back the last value written.

use std::sync::Mutex;

use serde_json::Value;

use super::defaults;
use super::{ConfigV1, ConfigV2};
use crate::context::Context;

/// Single-slot read-write config.
#[derive(Debug, Default)]
pub struct SingleSlotConfig {
    slot: Mutex<Option<Value>>,
}

impl SingleSlotConfig {
    /// A config with nothing set yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigV1 for SingleSlotConfig {
    fn get(&self, _ctx: &Context, key: &str) -> Option<Value> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some(value) => Some(value.clone()),
            None => defaults::builtin(key),
        }
    }
}

impl ConfigV2 for SingleSlotConfig {
    fn set(&self, _ctx: &Context, key: &str, value: Value) {
        tracing::debug!(key = %key, "Config slot overwritten");
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(value);
    }
}
