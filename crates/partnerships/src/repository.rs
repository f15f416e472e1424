//! Collaborator contracts consumed by the orchestrator.
//!
//! Implementations live in `carelink-infra` (in-memory and Postgres); the
//! orchestrator only depends on these traits.

use std::sync::Arc;

use async_trait::async_trait;

use carelink_core::OrganizationId;

use crate::error::RepositoryError;
use crate::organization::{NewOrganization, Organization};
use crate::partnership::{Invitation, PartnershipOptions};

/// Read access to organizations.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Returns `Ok(None)` when no organization has this id.
    async fn find_organization_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError>;
}

/// Persistence of partnerships (and of organizations created as partners).
#[async_trait]
pub trait PartnershipRepository: Send + Sync {
    /// Create a new organization in the context of `inviter_id`.
    ///
    /// The repository assigns the new organization's id.
    async fn create_partner(
        &self,
        inviter_id: OrganizationId,
        attrs: NewOrganization,
    ) -> Result<Organization, RepositoryError>;

    /// Record a partnership between `inviter_id` and `partner_id`.
    ///
    /// Not idempotent: calling twice records two partnerships.
    async fn create_partnership(
        &self,
        inviter_id: OrganizationId,
        partner_id: OrganizationId,
        options: PartnershipOptions,
    ) -> Result<Invitation, RepositoryError>;

    /// Remove the partnership for `(org_id, partner_id)`.
    ///
    /// Whether a missing pair is an error or a no-op is up to the implementation.
    async fn remove_partnership(
        &self,
        org_id: OrganizationId,
        partner_id: OrganizationId,
    ) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> OrganizationRepository for Arc<R>
where
    R: OrganizationRepository + ?Sized,
{
    async fn find_organization_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError> {
        (**self).find_organization_by_id(id).await
    }
}

#[async_trait]
impl<R> PartnershipRepository for Arc<R>
where
    R: PartnershipRepository + ?Sized,
{
    async fn create_partner(
        &self,
        inviter_id: OrganizationId,
        attrs: NewOrganization,
    ) -> Result<Organization, RepositoryError> {
        (**self).create_partner(inviter_id, attrs).await
    }

    async fn create_partnership(
        &self,
        inviter_id: OrganizationId,
        partner_id: OrganizationId,
        options: PartnershipOptions,
    ) -> Result<Invitation, RepositoryError> {
        (**self).create_partnership(inviter_id, partner_id, options).await
    }

    async fn remove_partnership(
        &self,
        org_id: OrganizationId,
        partner_id: OrganizationId,
    ) -> Result<(), RepositoryError> {
        (**self).remove_partnership(org_id, partner_id).await
    }
}
