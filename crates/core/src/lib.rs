//! `carelink-core` — identifiers and the domain error model shared by every
//! care-partnership crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{InvitationId, OrganizationId};
