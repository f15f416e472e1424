//! Organization records as seen by the partnership core (read-only).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use carelink_core::OrganizationId;

/// An organization owned by the organization subsystem.
///
/// Only `id`, `name` and `email_address` matter to partnerships; everything
/// else travels in `attributes` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub email_address: String,
    #[serde(flatten)]
    pub attributes: Map<String, JsonValue>,
}

/// Caller-supplied attributes for a new organization.
///
/// `id` is accepted so request bodies can be deserialized as-is, but it is
/// never forwarded: converting into [`NewOrganization`] drops it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrganizationId>,
    pub name: String,
    pub email_address: String,
    #[serde(flatten)]
    pub attributes: Map<String, JsonValue>,
}

impl OrganizationAttributes {
    pub fn new(name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email_address: email_address.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Attributes handed to the partnership repository to create an organization.
///
/// Identity is assigned by the repository, so there is no `id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub name: String,
    pub email_address: String,
    #[serde(flatten)]
    pub attributes: Map<String, JsonValue>,
}

impl From<OrganizationAttributes> for NewOrganization {
    fn from(value: OrganizationAttributes) -> Self {
        let OrganizationAttributes {
            id: _,
            name,
            email_address,
            attributes,
        } = value;
        Self {
            name,
            email_address,
            attributes,
        }
    }
}

impl NewOrganization {
    /// Materialize the organization once the repository has chosen its id.
    pub fn into_organization(self, id: OrganizationId) -> Organization {
        Organization {
            id,
            name: self.name,
            email_address: self.email_address,
            attributes: self.attributes,
        }
    }
}

/// One entry of a "create new partners" batch: organization attributes plus
/// the specialties the partnership should carry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartnerAttributes {
    #[serde(flatten)]
    pub organization: OrganizationAttributes,
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl PartnerAttributes {
    pub fn new(organization: OrganizationAttributes, specialties: Vec<String>) -> Self {
        Self {
            organization,
            specialties,
        }
    }
}
