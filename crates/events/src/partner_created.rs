//! `PartnerCreated`: one event per successful partnership batch.
//!
//! The payload is consumed by notification/email subscribers, so its JSON
//! shape (`inviter`, `invitationId`, `invited`) is a contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carelink_core::{InvitationId, OrganizationId};

use crate::event::Event;

/// The organization that issued the invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviterSummary {
    pub id: OrganizationId,
    pub name: String,
}

/// The organization that was linked or created as a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitedSummary {
    pub id: OrganizationId,
    pub email: String,
    pub name: String,
}

/// One newly formed partnership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerCreatedRecord {
    pub inviter: InviterSummary,
    pub invitation_id: InvitationId,
    pub invited: InvitedSummary,
}

/// Ordered records, one per request in the originating batch.
pub type PartnerCreatedPayload = Vec<PartnerCreatedRecord>;

/// Event: PartnerCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub payload: PartnerCreatedPayload,
}

impl PartnerCreated {
    pub const EVENT_TYPE: &'static str = "care.partner.created";

    /// Wrap a payload with a fresh event id and the current time.
    pub fn new(payload: PartnerCreatedPayload) -> Self {
        Self::at(Uuid::now_v7(), Utc::now(), payload)
    }

    pub fn at(event_id: Uuid, occurred_at: DateTime<Utc>, payload: PartnerCreatedPayload) -> Self {
        Self {
            event_id,
            occurred_at,
            payload,
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl Event for PartnerCreated {
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
