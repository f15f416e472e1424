//! Partnership formation orchestration.
//!
//! ```text
//! create_partner(inviter, attrs, ids)
//!   ↓
//! 1. Resolve every requested partner concurrently (link existing | create new)
//!   ↓  (wait for all; first failure aborts the batch)
//! 2. Look up the inviter's display name
//!   ↓
//! 3. Build one ordered PartnerCreated payload
//!   ↓
//! 4. Dispatch exactly one event
//!   ↓
//! 5. Return the partner organizations in request order
//! ```
//!
//! Nothing is rolled back on failure: partnerships persisted by sibling
//! resolutions before a failure stay persisted, and a dispatch failure leaves
//! the whole batch persisted.

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use carelink_core::OrganizationId;
use carelink_events::{
    EventDispatcher, InvitedSummary, InviterSummary, PartnerCreated, PartnerCreatedPayload,
    PartnerCreatedRecord,
};

use crate::error::PartnershipError;
use crate::organization::{NewOrganization, Organization, OrganizationAttributes, PartnerAttributes};
use crate::partnership::PartnershipOptions;
use crate::repository::{OrganizationRepository, PartnershipRepository};
use crate::request::{PartnerRequest, ResolvedPartner};

/// Forms and removes care partnerships on behalf of an inviting organization.
///
/// Collaborators are injected by the composition root; the orchestrator holds
/// no state of its own, so concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct PartnershipOrchestrator<O, P, D> {
    organizations: O,
    partnerships: P,
    dispatcher: D,
}

impl<O, P, D> PartnershipOrchestrator<O, P, D> {
    pub fn new(organizations: O, partnerships: P, dispatcher: D) -> Self {
        Self {
            organizations,
            partnerships,
            dispatcher,
        }
    }

    pub fn into_parts(self) -> (O, P, D) {
        (self.organizations, self.partnerships, self.dispatcher)
    }
}

impl<O, P, D> PartnershipOrchestrator<O, P, D>
where
    O: OrganizationRepository,
    P: PartnershipRepository,
    D: EventDispatcher<PartnerCreated>,
{
    /// Form partnerships for `org_id`, either linking the organizations in
    /// `ids` or creating one organization per entry of `partner_attrs`.
    ///
    /// `ids` takes precedence when present. Returns the partner organizations
    /// in request order.
    #[instrument(skip(self, partner_attrs, ids), fields(inviter_id = %org_id), err)]
    pub async fn create_partner(
        &self,
        org_id: OrganizationId,
        partner_attrs: Vec<PartnerAttributes>,
        ids: Option<Vec<OrganizationId>>,
    ) -> Result<Vec<Organization>, PartnershipError> {
        let requests = PartnerRequest::from_batch(ids, partner_attrs);
        self.create_partners(org_id, requests).await
    }

    /// Same as [`Self::create_partner`] for an already-built request batch.
    pub async fn create_partners(
        &self,
        org_id: OrganizationId,
        requests: Vec<PartnerRequest>,
    ) -> Result<Vec<Organization>, PartnershipError> {
        let resolved = self.resolve_all(org_id, requests).await?;

        let inviter = self
            .organizations
            .find_organization_by_id(org_id)
            .await?
            .ok_or(PartnershipError::NotFound(org_id))?;

        let payload = build_payload(org_id, &inviter.name, &resolved);
        self.dispatcher.dispatch(PartnerCreated::new(payload))?;

        info!(partners = resolved.len(), "care partnerships created");
        Ok(resolved.into_iter().map(|r| r.partner).collect())
    }

    /// Resolve every request concurrently and wait for all of them.
    async fn resolve_all(
        &self,
        inviter_id: OrganizationId,
        requests: Vec<PartnerRequest>,
    ) -> Result<Vec<ResolvedPartner>, PartnershipError> {
        let total = requests.len();
        let outcomes = join_all(
            requests
                .into_iter()
                .map(|request| self.resolve(inviter_id, request)),
        )
        .await;

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        if failed > 0 {
            warn!(
                failed,
                total, "partner resolution failed; partnerships from successful siblings remain"
            );
        }

        // First failure in request order wins.
        outcomes.into_iter().collect()
    }

    /// Resolve a single request through the path its variant selects.
    pub async fn resolve(
        &self,
        inviter_id: OrganizationId,
        request: PartnerRequest,
    ) -> Result<ResolvedPartner, PartnershipError> {
        match request {
            PartnerRequest::LinkExisting {
                partner_id,
                specialties,
            } => {
                self.link_existing_organization(inviter_id, partner_id, specialties)
                    .await
            }
            PartnerRequest::CreateNew {
                attributes,
                specialties,
            } => {
                self.create_new_care_partner(inviter_id, attributes, specialties)
                    .await
            }
        }
    }

    /// Link an organization that already exists.
    ///
    /// The partnership status is left at the repository default.
    #[instrument(skip(self, specialties), fields(%inviter_id, %partner_id), err)]
    pub async fn link_existing_organization(
        &self,
        inviter_id: OrganizationId,
        partner_id: OrganizationId,
        specialties: Vec<String>,
    ) -> Result<ResolvedPartner, PartnershipError> {
        let partner = self
            .organizations
            .find_organization_by_id(partner_id)
            .await?
            .ok_or(PartnershipError::NotFound(partner_id))?;

        let invitation = self
            .partnerships
            .create_partnership(
                inviter_id,
                partner_id,
                PartnershipOptions::with_specialties(specialties),
            )
            .await?;

        Ok(ResolvedPartner {
            invitation,
            partner,
        })
    }

    /// Provision a new organization and link it with a pending partnership.
    ///
    /// Any `id` in `data` is discarded; the repository assigns identity.
    #[instrument(skip(self, data, specialties), fields(%inviter_id), err)]
    pub async fn create_new_care_partner(
        &self,
        inviter_id: OrganizationId,
        data: OrganizationAttributes,
        specialties: Vec<String>,
    ) -> Result<ResolvedPartner, PartnershipError> {
        if let Some(ignored) = data.id {
            debug!(%ignored, "discarding caller-supplied organization id");
        }

        let partner = self
            .partnerships
            .create_partner(inviter_id, NewOrganization::from(data))
            .await?;

        let invitation = self
            .partnerships
            .create_partnership(
                inviter_id,
                partner.id,
                PartnershipOptions::pending(specialties),
            )
            .await?;

        Ok(ResolvedPartner {
            invitation,
            partner,
        })
    }

    /// Remove the partnership between `org_id` and `partner_id`.
    #[instrument(skip(self), fields(%org_id, %partner_id), err)]
    pub async fn remove_partnership(
        &self,
        org_id: OrganizationId,
        partner_id: OrganizationId,
    ) -> Result<(), PartnershipError> {
        self.partnerships
            .remove_partnership(org_id, partner_id)
            .await?;
        Ok(())
    }
}

/// Build the `PartnerCreated` payload, one record per resolved partner, in order.
///
/// Every record names the inviter by the id the batch was requested for.
pub fn build_payload(
    inviter_id: OrganizationId,
    inviter_name: &str,
    resolved: &[ResolvedPartner],
) -> PartnerCreatedPayload {
    resolved
        .iter()
        .map(|ResolvedPartner { invitation, partner }| PartnerCreatedRecord {
            inviter: InviterSummary {
                id: inviter_id,
                name: inviter_name.to_string(),
            },
            invitation_id: invitation.id,
            invited: InvitedSummary {
                id: partner.id,
                email: partner.email_address.clone(),
                name: partner.name.clone(),
            },
        })
        .collect()
}
