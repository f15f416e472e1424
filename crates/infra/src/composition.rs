//! Composition root: wires stores, event bus and orchestrator together.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

use carelink_events::{BusDispatcher, InMemoryEventBus, PartnerCreated};
use carelink_observability::ObservabilityConfig;
use carelink_partnerships::{
    OrganizationRepository, PartnershipOrchestrator, PartnershipRepository, RepositoryError,
};

use crate::config::{ConfigError, InfraConfig, StorageBackend};
use crate::repositories::postgres::apply_schema;
use crate::repositories::{
    InMemoryOrganizationStore, InMemoryPartnershipStore, PostgresOrganizationStore,
    PostgresPartnershipStore,
};

/// Bus carrying `PartnerCreated` events to in-process subscribers.
pub type PartnerEventBus = Arc<InMemoryEventBus<PartnerCreated>>;

/// Orchestrator over whichever storage backend the configuration selected.
pub type Orchestrator = PartnershipOrchestrator<
    Arc<dyn OrganizationRepository>,
    Arc<dyn PartnershipRepository>,
    BusDispatcher<PartnerEventBus>,
>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to postgres: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to apply schema: {0}")]
    Schema(#[from] RepositoryError),
}

/// In-memory stores plus an orchestrator over them.
///
/// The stores are exposed so tests and dev tooling can seed organizations
/// and inspect partnerships.
pub struct InMemoryComposition {
    pub organizations: Arc<InMemoryOrganizationStore>,
    pub partnerships: Arc<InMemoryPartnershipStore>,
    pub orchestrator: Orchestrator,
}

/// Wire an orchestrator over fresh in-memory stores.
pub fn in_memory(bus: PartnerEventBus) -> InMemoryComposition {
    let organizations = Arc::new(InMemoryOrganizationStore::new());
    let partnerships = Arc::new(InMemoryPartnershipStore::new(organizations.clone()));

    let orchestrator = PartnershipOrchestrator::new(
        organizations.clone() as Arc<dyn OrganizationRepository>,
        partnerships.clone() as Arc<dyn PartnershipRepository>,
        BusDispatcher::new(bus),
    );

    InMemoryComposition {
        organizations,
        partnerships,
        orchestrator,
    }
}

/// Connect to Postgres, ensure the schema exists and wire an orchestrator.
pub async fn postgres(
    url: &str,
    max_connections: u32,
    bus: PartnerEventBus,
) -> Result<Orchestrator, BootstrapError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    apply_schema(&pool).await?;

    Ok(PartnershipOrchestrator::new(
        Arc::new(PostgresOrganizationStore::new(pool.clone())) as Arc<dyn OrganizationRepository>,
        Arc::new(PostgresPartnershipStore::new(pool)) as Arc<dyn PartnershipRepository>,
        BusDispatcher::new(bus),
    ))
}

/// Build the orchestrator selected by `config`.
pub async fn build(config: &InfraConfig, bus: PartnerEventBus) -> Result<Orchestrator, BootstrapError> {
    match &config.storage {
        StorageBackend::InMemory => {
            info!(backend = "in_memory", "partnership storage configured");
            Ok(in_memory(bus).orchestrator)
        }
        StorageBackend::Postgres {
            url,
            max_connections,
        } => {
            info!(backend = "postgres", max_connections, "partnership storage configured");
            postgres(url, *max_connections, bus).await
        }
    }
}

/// Process startup: initialize logging, then build the orchestrator.
///
/// Hosting binaries call this (or [`bootstrap_from_env`]) once before serving.
pub async fn bootstrap(
    observability: &ObservabilityConfig,
    config: &InfraConfig,
    bus: PartnerEventBus,
) -> Result<Orchestrator, BootstrapError> {
    carelink_observability::tracing::init(observability);
    build(config, bus).await
}

/// [`bootstrap`] with both configurations read from the environment.
pub async fn bootstrap_from_env(bus: PartnerEventBus) -> Result<Orchestrator, BootstrapError> {
    let config = InfraConfig::from_env()?;
    bootstrap(&ObservabilityConfig::from_env(), &config, bus).await
}
