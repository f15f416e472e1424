//! Integration tests for the full partnership pipeline.
//!
//! Tests: Orchestrator → in-memory stores → EventBus → notice worker → outbox
//!
//! Verifies:
//! - Linked and newly created partners are persisted and returned in order
//! - Exactly one event per successful batch, none on failure
//! - Downstream notices are produced from the dispatched event

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use serde_json::Map;

    use carelink_core::{DomainError, OrganizationId};
    use carelink_events::{EventBus, InMemoryEventBus, PartnerCreated, Subscription};
    use carelink_partnerships::{
        Organization, OrganizationAttributes, PartnerAttributes, PartnershipError,
        PartnershipStatus, RepositoryError,
    };

    use carelink_observability::ObservabilityConfig;

    use crate::composition::{self, InMemoryComposition, PartnerEventBus};
    use crate::config::InfraConfig;
    use crate::workers::{InMemoryOutbox, InvitationNoticeWorker};

    fn org(name: &str, email: &str) -> Organization {
        Organization {
            id: OrganizationId::new(),
            name: name.to_string(),
            email_address: email.to_string(),
            attributes: Map::new(),
        }
    }

    fn setup() -> (InMemoryComposition, PartnerEventBus, Subscription<PartnerCreated>) {
        let bus: PartnerEventBus = Arc::new(InMemoryEventBus::new());
        // Subscribe before anything is published.
        let sub = bus.subscribe();
        (composition::in_memory(bus.clone()), bus, sub)
    }

    fn seed(app: &InMemoryComposition, orgs: &[&Organization]) {
        for o in orgs {
            app.organizations.upsert((*o).clone()).unwrap();
        }
    }

    #[tokio::test]
    async fn linking_existing_partners_persists_and_publishes_once() {
        let (app, _bus, sub) = setup();
        let acme = org("Acme", "a@a.com");
        let b = org("B Corp", "b@b.com");
        let c = org("C Care", "c@c.com");
        seed(&app, &[&acme, &b, &c]);

        let partners = app
            .orchestrator
            .create_partner(acme.id, vec![], Some(vec![b.id, c.id]))
            .await
            .unwrap();

        assert_eq!(partners, vec![b.clone(), c.clone()]);

        let stored = app.partnerships.partnerships_of(acme.id);
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|p| p.status == PartnershipStatus::Pending));

        let events = sub.drain();
        assert_eq!(events.len(), 1);
        let payload = &events[0].payload;
        assert_eq!(payload[0].inviter.name, "Acme");
        assert_eq!(payload[0].invited.email, "b@b.com");
        assert_eq!(payload[1].invited.id, c.id);
        assert_eq!(payload[0].invitation_id, stored[0].id);
    }

    #[tokio::test]
    async fn creating_new_partners_assigns_fresh_identities() {
        let (app, _bus, sub) = setup();
        let acme = org("Acme", "a@a.com");
        seed(&app, &[&acme]);

        let caller_chosen = OrganizationId::new();
        let mut clinic = OrganizationAttributes::new("Clinic X", "x@x.com")
            .with_attribute("phone", "555-0100");
        clinic.id = Some(caller_chosen);

        let partners = app
            .orchestrator
            .create_partner(
                acme.id,
                vec![PartnerAttributes::new(clinic, vec!["oncology".to_string()])],
                None,
            )
            .await
            .unwrap();

        let partner = &partners[0];
        assert_ne!(partner.id, caller_chosen);
        assert_eq!(partner.attributes.get("phone"), Some(&serde_json::json!("555-0100")));
        assert_eq!(app.partnerships.invited_by(partner.id), Some(acme.id));

        let stored = app.partnerships.partnerships_of(acme.id);
        assert_eq!(stored[0].specialties, vec!["oncology".to_string()]);
        assert_eq!(stored[0].status, PartnershipStatus::Pending);

        assert_eq!(sub.drain().len(), 1);
    }

    #[tokio::test]
    async fn unknown_partner_aborts_the_batch_without_an_event() {
        let (app, _bus, sub) = setup();
        let acme = org("Acme", "a@a.com");
        let b = org("B Corp", "b@b.com");
        seed(&app, &[&acme, &b]);
        let ghost = OrganizationId::new();

        let err = app
            .orchestrator
            .create_partner(acme.id, vec![], Some(vec![ghost, b.id]))
            .await
            .unwrap_err();

        assert_eq!(err, PartnershipError::NotFound(ghost));
        assert!(sub.drain().is_empty());
        // No compensation: the resolved sibling stays.
        assert_eq!(app.partnerships.partnerships_of(acme.id).len(), 1);
    }

    #[tokio::test]
    async fn collaborator_validation_failure_is_surfaced() {
        let (app, _bus, sub) = setup();
        let acme = org("Acme", "a@a.com");
        seed(&app, &[&acme]);

        let err = app
            .orchestrator
            .create_partner(
                acme.id,
                vec![PartnerAttributes::new(OrganizationAttributes::new("", "x@x.com"), vec![])],
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PartnershipError::Repository(RepositoryError::Domain(DomainError::Validation(_)))
        ));
        assert!(sub.drain().is_empty());
    }

    #[tokio::test]
    async fn removing_a_partnership_deletes_only_that_pair() {
        let (app, _bus, _sub) = setup();
        let acme = org("Acme", "a@a.com");
        let b = org("B Corp", "b@b.com");
        let c = org("C Care", "c@c.com");
        seed(&app, &[&acme, &b, &c]);

        app.orchestrator
            .create_partner(acme.id, vec![], Some(vec![b.id, c.id]))
            .await
            .unwrap();
        app.orchestrator.remove_partnership(acme.id, b.id).await.unwrap();

        let remaining: Vec<_> = app
            .partnerships
            .partnerships_of(acme.id)
            .into_iter()
            .map(|p| p.partner_id)
            .collect();
        assert_eq!(remaining, vec![c.id]);
    }

    #[tokio::test]
    async fn dispatched_event_reaches_the_invitation_outbox() {
        let (app, bus, _sub) = setup();
        let outbox = Arc::new(InMemoryOutbox::new());
        let worker = InvitationNoticeWorker::spawn(bus.clone(), outbox.clone()).unwrap();
        let acme = org("Acme", "a@a.com");
        let b = org("B Corp", "b@b.com");
        seed(&app, &[&acme, &b]);

        app.orchestrator
            .create_partner(acme.id, vec![], Some(vec![b.id]))
            .await
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while outbox.notices().is_empty() && Instant::now() < deadline {
            tokio::task::yield_now().await;
            std::thread::sleep(Duration::from_millis(10));
        }
        worker.shutdown();

        let notices = outbox.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].recipient, "b@b.com");
        assert_eq!(notices[0].inviter_name, "Acme");
    }

    #[tokio::test]
    async fn default_config_builds_an_in_memory_orchestrator() {
        let config = InfraConfig::from_vars(|_| None).unwrap();
        let bus: PartnerEventBus = Arc::new(InMemoryEventBus::new());

        let orchestrator = composition::build(&config, bus).await.unwrap();

        // Nothing seeded: linking any id must be NotFound.
        let ghost = OrganizationId::new();
        let err = orchestrator
            .create_partner(OrganizationId::new(), vec![], Some(vec![ghost]))
            .await
            .unwrap_err();
        assert_eq!(err, PartnershipError::NotFound(ghost));
    }

    #[tokio::test]
    async fn bootstrap_initializes_logging_and_builds_from_config() {
        let observability = ObservabilityConfig::from_vars(|key| match key {
            "CARELINK_LOG_FORMAT" => Some("pretty".to_string()),
            _ => None,
        });
        let config = InfraConfig::from_vars(|_| None).unwrap();
        let bus: PartnerEventBus = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();

        let orchestrator = composition::bootstrap(&observability, &config, bus)
            .await
            .unwrap();

        let ghost_inviter = OrganizationId::new();
        let err = orchestrator
            .create_partner(ghost_inviter, vec![], None)
            .await
            .unwrap_err();
        assert_eq!(err, PartnershipError::NotFound(ghost_inviter));
        assert!(sub.drain().is_empty());
    }
}
