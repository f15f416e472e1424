//! Postgres-backed organization and partnership stores.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError | Scenario |
//! |------------|----------------------|-----------------|----------|
//! | Database (foreign key violation) | `23503` | `Domain(NotFound)` | Partnership references a missing organization |
//! | Database (check constraint violation) | `23514` | `Domain(Validation)` | Empty name, unknown status |
//! | Database (other) | Any other | `Storage` | Other database errors |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` | Database unreachable |
//! | Other | N/A | `Storage` | Decoding failures, protocol errors, etc. |
//!
//! Schema lives in `migrations/0001_care_partnerships.sql` and can be applied
//! with [`apply_schema`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use carelink_core::{DomainError, InvitationId, OrganizationId};
use carelink_partnerships::{
    Invitation, NewOrganization, Organization, OrganizationRepository, PartnershipOptions,
    PartnershipRepository, PartnershipStatus, RepositoryError,
};

const SCHEMA: &str = include_str!("../../migrations/0001_care_partnerships.sql");

const INSERT_PARTNERSHIP_WITH_STATUS: &str = r#"
    INSERT INTO care_partnerships (invitation_id, organization_id, partner_id, specialties, status)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING invitation_id, organization_id, partner_id, status, specialties, created_at
"#;

// Status omitted so the column default applies.
const INSERT_PARTNERSHIP_DEFAULT_STATUS: &str = r#"
    INSERT INTO care_partnerships (invitation_id, organization_id, partner_id, specialties)
    VALUES ($1, $2, $3, $4)
    RETURNING invitation_id, organization_id, partner_id, status, specialties, created_at
"#;

/// Create the organization and partnership tables if they do not exist.
pub async fn apply_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("apply_schema", e))?;
    Ok(())
}

/// Organization lookups against the `organizations` table.
#[derive(Debug, Clone)]
pub struct PostgresOrganizationStore {
    pool: Arc<PgPool>,
}

impl PostgresOrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationStore {
    #[instrument(skip(self), fields(organization_id = %id), err)]
    async fn find_organization_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email_address, attributes
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_organization_by_id", e))?;

        row.map(|row| {
            OrganizationRow::from_row(&row)
                .map(Organization::from)
                .map_err(|e| map_sqlx_error("find_organization_by_id", e))
        })
        .transpose()
    }
}

/// Partnerships (and partner organizations) against Postgres.
#[derive(Debug, Clone)]
pub struct PostgresPartnershipStore {
    pool: Arc<PgPool>,
}

impl PostgresPartnershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl PartnershipRepository for PostgresPartnershipStore {
    #[instrument(skip(self, attrs), fields(%inviter_id), err)]
    async fn create_partner(
        &self,
        inviter_id: OrganizationId,
        attrs: NewOrganization,
    ) -> Result<Organization, RepositoryError> {
        let id = OrganizationId::new();
        let row = sqlx::query(
            r#"
            INSERT INTO organizations (id, name, email_address, attributes, invited_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email_address, attributes
            "#,
        )
        .bind(id.as_uuid())
        .bind(&attrs.name)
        .bind(&attrs.email_address)
        .bind(JsonValue::Object(attrs.attributes))
        .bind(inviter_id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_partner", e))?;

        let organization = OrganizationRow::from_row(&row)
            .map_err(|e| map_sqlx_error("create_partner", e))?;
        Ok(organization.into())
    }

    #[instrument(skip(self, options), fields(%inviter_id, %partner_id), err)]
    async fn create_partnership(
        &self,
        inviter_id: OrganizationId,
        partner_id: OrganizationId,
        options: PartnershipOptions,
    ) -> Result<Invitation, RepositoryError> {
        let invitation_id = InvitationId::new();
        let query = match options.status {
            Some(status) => sqlx::query(INSERT_PARTNERSHIP_WITH_STATUS)
                .bind(invitation_id.as_uuid())
                .bind(inviter_id.as_uuid())
                .bind(partner_id.as_uuid())
                .bind(&options.specialties)
                .bind(status.as_str()),
            None => sqlx::query(INSERT_PARTNERSHIP_DEFAULT_STATUS)
                .bind(invitation_id.as_uuid())
                .bind(inviter_id.as_uuid())
                .bind(partner_id.as_uuid())
                .bind(&options.specialties),
        };

        let row = query
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_partnership", e))?;

        PartnershipRow::from_row(&row)
            .map_err(|e| map_sqlx_error("create_partnership", e))?
            .try_into()
    }

    #[instrument(skip(self), fields(%org_id, %partner_id), err)]
    async fn remove_partnership(
        &self,
        org_id: OrganizationId,
        partner_id: OrganizationId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM care_partnerships
            WHERE organization_id = $1 AND partner_id = $2
            "#,
        )
        .bind(org_id.as_uuid())
        .bind(partner_id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("remove_partnership", e))?;

        tracing::debug!(removed = result.rows_affected(), "partnership removal");
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23503") => DomainError::not_found(msg).into(),
                Some("23514") => DomainError::validation(msg).into(),
                _ => RepositoryError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            RepositoryError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::Io(e) => RepositoryError::Unavailable(format!("io error in {operation}: {e}")),
        other => RepositoryError::Storage(format!("sqlx error in {operation}: {other}")),
    }
}

#[derive(Debug)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    email_address: String,
    attributes: JsonValue,
}

impl<'r> FromRow<'r, PgRow> for OrganizationRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrganizationRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email_address: row.try_get("email_address")?,
            attributes: row.try_get("attributes")?,
        })
    }
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        let attributes = match row.attributes {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        };
        Organization {
            id: OrganizationId::from_uuid(row.id),
            name: row.name,
            email_address: row.email_address,
            attributes,
        }
    }
}

#[derive(Debug)]
struct PartnershipRow {
    invitation_id: Uuid,
    organization_id: Uuid,
    partner_id: Uuid,
    status: String,
    specialties: Vec<String>,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for PartnershipRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(PartnershipRow {
            invitation_id: row.try_get("invitation_id")?,
            organization_id: row.try_get("organization_id")?,
            partner_id: row.try_get("partner_id")?,
            status: row.try_get("status")?,
            specialties: row.try_get("specialties")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFrom<PartnershipRow> for Invitation {
    type Error = RepositoryError;

    fn try_from(row: PartnershipRow) -> Result<Self, Self::Error> {
        let status: PartnershipStatus = row.status.parse()?;
        Ok(Invitation {
            id: InvitationId::from_uuid(row.invitation_id),
            inviter_id: OrganizationId::from_uuid(row.organization_id),
            partner_id: OrganizationId::from_uuid(row.partner_id),
            status,
            specialties: row.specialties,
            created_at: row.created_at,
        })
    }
}
