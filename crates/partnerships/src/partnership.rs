//! Partnership records and their lifecycle status.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carelink_core::{DomainError, InvitationId, OrganizationId};

/// Partnership status lifecycle.
///
/// The core only ever creates partnerships (`Pending`, or whatever the
/// repository defaults to) and removes them; approval happens elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnershipStatus {
    #[default]
    Pending,
    Approved,
}

impl PartnershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnershipStatus::Pending => "pending",
            PartnershipStatus::Approved => "approved",
        }
    }
}

impl core::fmt::Display for PartnershipStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartnershipStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PartnershipStatus::Pending),
            "approved" => Ok(PartnershipStatus::Approved),
            other => Err(DomainError::validation(format!(
                "unknown partnership status '{other}'"
            ))),
        }
    }
}

/// Options for creating a partnership.
///
/// `status: None` leaves the status at the repository's default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartnershipOptions {
    pub status: Option<PartnershipStatus>,
    pub specialties: Vec<String>,
}

impl PartnershipOptions {
    pub fn with_specialties(specialties: Vec<String>) -> Self {
        Self {
            status: None,
            specialties,
        }
    }

    pub fn pending(specialties: Vec<String>) -> Self {
        Self {
            status: Some(PartnershipStatus::Pending),
            specialties,
        }
    }
}

/// A persisted partnership between an inviter and a partner organization.
///
/// Its identity is the invitation id assigned by the repository on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: InvitationId,
    pub inviter_id: OrganizationId,
    pub partner_id: OrganizationId,
    pub status: PartnershipStatus,
    pub specialties: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Whether this partnership links exactly `(inviter_id, partner_id)`.
    pub fn links(&self, inviter_id: OrganizationId, partner_id: OrganizationId) -> bool {
        self.inviter_id == inviter_id && self.partner_id == partner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_display() {
        for status in [PartnershipStatus::Pending, PartnershipStatus::Approved] {
            assert_eq!(status.to_string().parse::<PartnershipStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert!(matches!(
            "declined".parse::<PartnershipStatus>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn default_status_is_pending() {
        assert_eq!(PartnershipStatus::default(), PartnershipStatus::Pending);
        assert_eq!(PartnershipOptions::default().status, None);
    }
}
