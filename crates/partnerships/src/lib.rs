//! Care partnerships between organizations.
//!
//! An inviting organization either links an existing organization as a
//! partner or provisions a brand-new one; each link is recorded as a
//! partnership carrying specialty tags and a status. A successful batch
//! emits a single [`carelink_events::PartnerCreated`] event.
//!
//! Storage and event transport are collaborators supplied by the caller
//! (see [`repository`]); this crate only orchestrates them.

pub mod error;
pub mod orchestrator;
pub mod organization;
pub mod partnership;
pub mod repository;
pub mod request;

pub use error::{PartnershipError, RepositoryError};
pub use orchestrator::{PartnershipOrchestrator, build_payload};
pub use organization::{NewOrganization, Organization, OrganizationAttributes, PartnerAttributes};
pub use partnership::{Invitation, PartnershipOptions, PartnershipStatus};
pub use repository::{OrganizationRepository, PartnershipRepository};
pub use request::{PartnerRequest, ResolvedPartner};
