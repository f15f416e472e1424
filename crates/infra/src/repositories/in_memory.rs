use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use carelink_core::{DomainError, InvitationId, OrganizationId};
use carelink_partnerships::{
    Invitation, NewOrganization, Organization, OrganizationRepository, PartnershipOptions,
    PartnershipRepository, RepositoryError,
};

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

/// In-memory organization directory.
///
/// Intended for tests/dev. Organizations are seeded with [`Self::upsert`] or
/// created through [`InMemoryPartnershipStore::create_partner`].
#[derive(Debug, Default)]
pub struct InMemoryOrganizationStore {
    organizations: RwLock<HashMap<OrganizationId, Organization>>,
}

impl InMemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, organization: Organization) -> Result<(), RepositoryError> {
        self.organizations
            .write()
            .map_err(|_| poisoned())?
            .insert(organization.id, organization);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.organizations.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationStore {
    async fn find_organization_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError> {
        let map = self.organizations.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }
}

/// In-memory partnership store.
///
/// Shares the organization directory so partners created here are visible to
/// later lookups. Partnerships default to `Pending`; removing a pair that
/// does not exist is a no-op.
#[derive(Debug)]
pub struct InMemoryPartnershipStore {
    organizations: Arc<InMemoryOrganizationStore>,
    partnerships: RwLock<Vec<Invitation>>,
    invited_by: RwLock<HashMap<OrganizationId, OrganizationId>>,
}

impl InMemoryPartnershipStore {
    pub fn new(organizations: Arc<InMemoryOrganizationStore>) -> Self {
        Self {
            organizations,
            partnerships: RwLock::new(Vec::new()),
            invited_by: RwLock::new(HashMap::new()),
        }
    }

    /// Every partnership recorded for `inviter_id`, in creation order.
    pub fn partnerships_of(&self, inviter_id: OrganizationId) -> Vec<Invitation> {
        match self.partnerships.read() {
            Ok(rows) => rows
                .iter()
                .filter(|p| p.inviter_id == inviter_id)
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }

    /// The inviter an organization was created for, if it was created here.
    pub fn invited_by(&self, partner_id: OrganizationId) -> Option<OrganizationId> {
        self.invited_by.read().ok()?.get(&partner_id).copied()
    }
}

#[async_trait]
impl PartnershipRepository for InMemoryPartnershipStore {
    async fn create_partner(
        &self,
        inviter_id: OrganizationId,
        attrs: NewOrganization,
    ) -> Result<Organization, RepositoryError> {
        if attrs.name.trim().is_empty() {
            return Err(DomainError::validation("organization name must not be empty").into());
        }

        let organization = attrs.into_organization(OrganizationId::new());
        self.organizations.upsert(organization.clone())?;
        self.invited_by
            .write()
            .map_err(|_| poisoned())?
            .insert(organization.id, inviter_id);

        debug!(%inviter_id, partner_id = %organization.id, "partner organization created");
        Ok(organization)
    }

    async fn create_partnership(
        &self,
        inviter_id: OrganizationId,
        partner_id: OrganizationId,
        options: PartnershipOptions,
    ) -> Result<Invitation, RepositoryError> {
        let invitation = Invitation {
            id: InvitationId::new(),
            inviter_id,
            partner_id,
            status: options.status.unwrap_or_default(),
            specialties: options.specialties,
            created_at: Utc::now(),
        };

        self.partnerships
            .write()
            .map_err(|_| poisoned())?
            .push(invitation.clone());

        Ok(invitation)
    }

    async fn remove_partnership(
        &self,
        org_id: OrganizationId,
        partner_id: OrganizationId,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.partnerships.write().map_err(|_| poisoned())?;
        let before = rows.len();
        rows.retain(|p| !p.links(org_id, partner_id));
        debug!(%org_id, %partner_id, removed = before - rows.len(), "partnership removal");
        Ok(())
    }
}
