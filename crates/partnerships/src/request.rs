//! Per-item partner requests and their common resolution shape.

use carelink_core::OrganizationId;

use crate::organization::{Organization, OrganizationAttributes, PartnerAttributes};
use crate::partnership::Invitation;

/// One requested partner within a `create_partner` batch.
#[derive(Debug, Clone, PartialEq)]
pub enum PartnerRequest {
    /// Link an organization that already exists.
    LinkExisting {
        partner_id: OrganizationId,
        specialties: Vec<String>,
    },
    /// Provision a brand-new organization and link it.
    CreateNew {
        attributes: OrganizationAttributes,
        specialties: Vec<String>,
    },
}

impl PartnerRequest {
    pub fn link(partner_id: OrganizationId) -> Self {
        Self::LinkExisting {
            partner_id,
            specialties: Vec::new(),
        }
    }

    pub fn create(attrs: PartnerAttributes) -> Self {
        Self::CreateNew {
            attributes: attrs.organization,
            specialties: attrs.specialties,
        }
    }

    /// Turn a raw batch into requests, preserving order.
    ///
    /// When `ids` is present it wins and `attrs` is ignored.
    pub fn from_batch(ids: Option<Vec<OrganizationId>>, attrs: Vec<PartnerAttributes>) -> Vec<Self> {
        match ids {
            Some(ids) => ids.into_iter().map(Self::link).collect(),
            None => attrs.into_iter().map(Self::create).collect(),
        }
    }
}

/// The result of resolving one [`PartnerRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPartner {
    pub invitation: Invitation,
    pub partner: Organization,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_take_precedence_over_attributes() {
        let a = OrganizationId::new();
        let b = OrganizationId::new();
        let attrs = vec![PartnerAttributes::new(
            OrganizationAttributes::new("ignored", "ignored@x.com"),
            vec![],
        )];

        let requests = PartnerRequest::from_batch(Some(vec![a, b]), attrs);

        assert_eq!(requests, vec![PartnerRequest::link(a), PartnerRequest::link(b)]);
    }

    #[test]
    fn attributes_become_create_requests_in_order() {
        let attrs = vec![
            PartnerAttributes::new(OrganizationAttributes::new("One", "1@x.com"), vec!["oncology".into()]),
            PartnerAttributes::new(OrganizationAttributes::new("Two", "2@x.com"), vec![]),
        ];

        let requests = PartnerRequest::from_batch(None, attrs);

        let names: Vec<_> = requests
            .iter()
            .map(|r| match r {
                PartnerRequest::CreateNew { attributes, .. } => attributes.name.as_str(),
                PartnerRequest::LinkExisting { .. } => panic!("expected CreateNew"),
            })
            .collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn empty_id_list_still_wins() {
        let attrs = vec![PartnerAttributes::default()];
        assert!(PartnerRequest::from_batch(Some(vec![]), attrs).is_empty());
    }
}
