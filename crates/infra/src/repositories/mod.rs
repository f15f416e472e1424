//! Implementations of the partnership collaborator traits.
//!
//! - [`in_memory`]: process-local stores for tests/dev
//! - [`postgres`]: sqlx-backed stores for deployments

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryOrganizationStore, InMemoryPartnershipStore};
pub use postgres::{PostgresOrganizationStore, PostgresPartnershipStore};
