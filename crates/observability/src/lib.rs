//! Tracing/logging setup shared by every process that hosts the partnership core.

pub mod tracing;

pub use crate::tracing::{LogFormat, ObservabilityConfig};

/// Initialize process-wide tracing from the environment.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    crate::tracing::init(&ObservabilityConfig::from_env());
}
