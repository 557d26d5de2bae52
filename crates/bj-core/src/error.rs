//! Error types for level generation

use strum::Display;
use thiserror::Error;

/// Fatal generation failures. Unviable maps are retried internally and only
/// surface here once a configured regeneration ceiling is reached.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("scratch arena exhausted: requested {requested} bytes, {remaining} remaining")]
    ScratchExhausted { requested: usize, remaining: usize },

    #[error("gave up after {attempts} regenerations of level {level}")]
    RegenerationLimit { level: i32, attempts: u32 },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Problems loading or validating a [`GenConfig`](crate::GenConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Occupant pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PoolKind {
    Enemies,
    Details,
}

/// An occupant pool had no room left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{pool} pool is full ({capacity} entries)")]
pub struct PoolExhausted {
    pub pool: PoolKind,
    pub capacity: usize,
}
