//! Error types shared by the worker pool and configuration loading.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool exhausted: requested {requested} workers, maximum is {max}")]
    WorkerPoolExhausted { requested: usize, max: usize },

    #[error("stale slot access: slot {slot} is not below the active count {active}")]
    StaleSlotAccess { slot: usize, active: usize },

    #[error("slot {slot} has no buffer; its worker still owns it")]
    SlotBusy { slot: usize },

    #[error("failed to spawn worker: {0}")]
    Spawn(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
