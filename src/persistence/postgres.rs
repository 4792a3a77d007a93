//! PostgreSQL implementation of the store traits.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{CredentialRow, ParticipantRow};
use super::{CredentialStore, EventSettingsStore, ParticipantStore, StoreError};
use crate::domain::credential::AdminCredential;
use crate::domain::event_config::EventConfiguration;
use crate::domain::participant::{NewParticipant, Participant, ParticipantPatch};
use crate::domain::participant_id::ParticipantId;

const PARTICIPANT_COLUMNS: &str = "id, full_name, tax_id, email, phone, birth_date, gender, \
     city, state, company_name, revenue_bracket, sector, tier, payment_status, registered_at, \
     attendance_confirmed";

const LATEST_SETTINGS: &str =
    "SELECT id, document FROM event_settings ORDER BY updated_at DESC, id DESC LIMIT 1";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

fn to_document(config: &EventConfiguration) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(config).map_err(|e| StoreError::Backend(e.to_string()))
}

fn from_document(
    (id, document): (Uuid, serde_json::Value),
) -> Result<(Uuid, EventConfiguration), StoreError> {
    serde_json::from_value(document)
        .map(|config| (id, config))
        .map_err(|e| StoreError::Backend(e.to_string()))
}

#[async_trait]
impl ParticipantStore for PostgresStore {
    async fn list(&self) -> Result<Vec<Participant>, StoreError> {
        let rows = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants ORDER BY registered_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Participant::try_from).collect()
    }

    async fn get(&self, id: ParticipantId) -> Result<Option<Participant>, StoreError> {
        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Participant::try_from).transpose()
    }

    async fn insert(&self, new: &NewParticipant) -> Result<Participant, StoreError> {
        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            "INSERT INTO participants (full_name, tax_id, email, phone, birth_date, gender, city, \
             state, company_name, revenue_bracket, sector, tier, payment_status, \
             attendance_confirmed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(&new.full_name)
        .bind(&new.tax_id)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.birth_date)
        .bind(new.gender.map(|g| g.as_str()))
        .bind(&new.city)
        .bind(&new.state)
        .bind(new.company_name.as_deref())
        .bind(new.revenue_bracket.map(|b| b.as_str()))
        .bind(new.sector.map(|s| s.as_str()))
        .bind(new.tier.as_str())
        .bind(new.payment_status.as_str())
        .bind(new.attendance_confirmed)
        .fetch_one(&self.pool)
        .await?;

        Participant::try_from(row)
    }

    async fn update(&self, id: ParticipantId, patch: &ParticipantPatch) -> Result<Participant, StoreError> {
        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            "UPDATE participants SET \
             full_name = COALESCE($2, full_name), \
             email = COALESCE($3, email), \
             phone = COALESCE($4, phone), \
             birth_date = CASE WHEN $14 THEN $5 ELSE birth_date END, \
             gender = CASE WHEN $15 THEN $6 ELSE gender END, \
             city = COALESCE($7, city), \
             state = COALESCE($8, state), \
             company_name = CASE WHEN $16 THEN $9 ELSE company_name END, \
             revenue_bracket = CASE WHEN $17 THEN $10 ELSE revenue_bracket END, \
             sector = CASE WHEN $18 THEN $11 ELSE sector END, \
             payment_status = COALESCE($12, payment_status), \
             attendance_confirmed = COALESCE($13, attendance_confirmed) \
             WHERE id = $1 RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(patch.full_name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.birth_date.flatten())
        .bind(patch.gender.flatten().map(|g| g.as_str()))
        .bind(patch.city.as_deref())
        .bind(patch.state.as_deref())
        .bind(patch.company_name.as_ref().and_then(Option::as_deref))
        .bind(patch.revenue_bracket.flatten().map(|b| b.as_str()))
        .bind(patch.sector.flatten().map(|s| s.as_str()))
        .bind(patch.payment_status.map(|s| s.as_str()))
        .bind(patch.attendance_confirmed)
        .bind(patch.birth_date.is_some())
        .bind(patch.gender.is_some())
        .bind(patch.company_name.is_some())
        .bind(patch.revenue_bracket.is_some())
        .bind(patch.sector.is_some())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Participant::try_from(row)
    }

    async fn delete(&self, id: ParticipantId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl EventSettingsStore for PostgresStore {
    async fn fetch(&self) -> Result<Option<(Uuid, EventConfiguration)>, StoreError> {
        let row = sqlx::query_as::<_, (Uuid, serde_json::Value)>(LATEST_SETTINGS)
            .fetch_optional(&self.pool)
            .await?;

        row.map(from_document).transpose()
    }

    async fn get_or_create(
        &self,
        default: &EventConfiguration,
    ) -> Result<(Uuid, EventConfiguration), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE event_settings IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, (Uuid, serde_json::Value)>(LATEST_SETTINGS)
            .fetch_optional(&mut *tx)
            .await?;

        let row = match existing {
            Some(row) => from_document(row)?,
            None => {
                let id = sqlx::query_scalar::<_, Uuid>(
                    "INSERT INTO event_settings (document) VALUES ($1) RETURNING id",
                )
                .bind(to_document(default)?)
                .fetch_one(&mut *tx)
                .await?;
                (id, default.clone())
            }
        };

        tx.commit().await?;
        Ok(row)
    }

    async fn insert(&self, config: &EventConfiguration) -> Result<Uuid, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO event_settings (document) VALUES ($1) RETURNING id",
        )
        .bind(to_document(config)?)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn replace(&self, id: Uuid, config: &EventConfiguration) -> Result<Uuid, StoreError> {
        let document = to_document(config)?;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE event_settings SET document = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(&document)
        .execute(&mut *tx)
        .await?;

        let surviving = if updated.rows_affected() > 0 {
            id
        } else {
            sqlx::query("DELETE FROM event_settings")
                .execute(&mut *tx)
                .await?;
            sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO event_settings (document) VALUES ($1) RETURNING id",
            )
            .bind(&document)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(surviving)
    }
}

#[async_trait]
impl CredentialStore for PostgresStore {
    async fn count(&self) -> Result<u64, StoreError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_credentials")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, email, password_hash FROM admin_credentials WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AdminCredential::from))
    }

    async fn insert_if_empty(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminCredential>, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE admin_credentials IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, CredentialRow>(
            "INSERT INTO admin_credentials (email, password_hash) \
             SELECT $1, $2 WHERE NOT EXISTS (SELECT 1 FROM admin_credentials) \
             RETURNING id, email, password_hash",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.map(AdminCredential::from))
    }
}
