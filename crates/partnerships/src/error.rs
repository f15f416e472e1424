//! Error taxonomy for partnership formation.

use thiserror::Error;

use carelink_core::{DomainError, OrganizationId};
use carelink_events::DispatchError;

/// Failure reported by an organization or partnership repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store failed (query error, lock poisoning, ...).
    #[error("storage failure: {0}")]
    Storage(String),

    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The repository rejected the input on domain grounds.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Error returned by [`crate::PartnershipOrchestrator`].
///
/// Collaborator failures are wrapped without modification; the orchestrator
/// never retries or compensates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartnershipError {
    /// An organization referenced by the request does not exist.
    #[error("organization not found: {0}")]
    NotFound(OrganizationId),

    /// A repository collaborator failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The `PartnerCreated` event could not be dispatched. Partnerships
    /// created before the failure remain persisted.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
