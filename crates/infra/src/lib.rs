//! Infrastructure layer: repository implementations, configuration,
//! composition root and background workers.

pub mod composition;
pub mod config;
pub mod repositories;
pub mod workers;

#[cfg(test)]
mod integration_tests;
