//! Runtime selection of the bus backend.

use std::sync::Arc;

use serde::Deserialize;

use crate::{EventBus, bus::{LogEventBus, MemoryEventBus}};

/// Bus backend selection.
///
/// ```toml
/// [bus]
/// type = "log"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusConfig {
    /// Emit published messages as log events (the default).
    Log,
    /// Capture published messages in memory.
    Memory,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::Log
    }
}

impl BusConfig {
    /// Construct the bus handle from this configuration.
    #[must_use]
    pub fn into_bus(self) -> Arc<dyn EventBus> {
        match self {
            Self::Log => Arc::new(LogEventBus::new()),
            Self::Memory => Arc::new(MemoryEventBus::new()),
        }
    }
}
