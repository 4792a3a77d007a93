//! Database row types and their conversion into domain records.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::StoreError;
use crate::domain::credential::AdminCredential;
use crate::domain::participant::{Participant, UnknownValue};
use crate::domain::participant_id::ParticipantId;

/// A row of the `participants` table. Enumerations are stored as their
/// wire names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    /// Primary key.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Tax id digits.
    pub tax_id: String,
    /// Normalized email.
    pub email: String,
    /// Phone digits.
    pub phone: String,
    /// Birth date.
    pub birth_date: Option<NaiveDate>,
    /// Gender wire name.
    pub gender: Option<String>,
    /// City.
    pub city: String,
    /// State code.
    pub state: String,
    /// Company name.
    pub company_name: Option<String>,
    /// Revenue bracket wire name.
    pub revenue_bracket: Option<String>,
    /// Sector wire name.
    pub sector: Option<String>,
    /// Tier wire name.
    pub tier: String,
    /// Payment status wire name.
    pub payment_status: String,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Attendance flag.
    pub attendance_confirmed: bool,
}

impl From<UnknownValue> for StoreError {
    fn from(err: UnknownValue) -> Self {
        Self::Backend(err.to_string())
    }
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = StoreError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ParticipantId::from_uuid(row.id),
            full_name: row.full_name,
            tax_id: row.tax_id,
            email: row.email,
            phone: row.phone,
            birth_date: row.birth_date,
            gender: row.gender.as_deref().map(str::parse).transpose()?,
            city: row.city,
            state: row.state,
            company_name: row.company_name,
            revenue_bracket: row.revenue_bracket.as_deref().map(str::parse).transpose()?,
            sector: row.sector.as_deref().map(str::parse).transpose()?,
            tier: row.tier.parse()?,
            payment_status: row.payment_status.parse()?,
            registered_at: row.registered_at,
            attendance_confirmed: row.attendance_confirmed,
        })
    }
}

/// A row of the `admin_credentials` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRow {
    /// Primary key.
    pub id: Uuid,
    /// Normalized email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl From<CredentialRow> for AdminCredential {
    fn from(row: CredentialRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::participant::{RevenueBracket, Tier};

    fn row() -> ParticipantRow {
        ParticipantRow {
            id: Uuid::new_v4(),
            full_name: "Ana".to_string(),
            tax_id: "52998224725".to_string(),
            email: "ana@x.com".to_string(),
            phone: "11988887777".to_string(),
            birth_date: None,
            gender: Some("female".to_string()),
            city: "Campinas".to_string(),
            state: "SP".to_string(),
            company_name: None,
            revenue_bracket: Some("5m-10m".to_string()),
            sector: None,
            tier: "paid".to_string(),
            payment_status: "pending".to_string(),
            registered_at: Utc::now(),
            attendance_confirmed: false,
        }
    }

    #[test]
    fn converts_wire_names() {
        let Ok(p) = Participant::try_from(row()) else {
            panic!("row should convert");
        };
        assert_eq!(p.tier, Tier::Paid);
        assert_eq!(p.revenue_bracket, Some(RevenueBracket::From5mTo10m));
    }

    #[test]
    fn unknown_enum_value_is_a_backend_error() {
        let mut bad = row();
        bad.tier = "vip".to_string();
        assert!(matches!(
            Participant::try_from(bad),
            Err(StoreError::Backend(msg)) if msg.contains("vip")
        ));
    }
}
