//! Participant record and its enumerated attributes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParticipantId;

/// Error returned when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownValue {
    /// Attribute being parsed (e.g. `"tier"`).
    pub kind: &'static str,
    /// Offending input.
    pub value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Registration category, fixed at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free admission.
    Free,
    /// Paid admission; carries a payment status.
    Paid,
}

impl Tier {
    /// Wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
        }
    }

    /// Payment status a new registration in this tier starts with.
    #[must_use]
    pub const fn initial_payment_status(self) -> PaymentStatus {
        match self {
            Self::Free => PaymentStatus::Approved,
            Self::Paid => PaymentStatus::Pending,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "paid" => Ok(Self::Paid),
            other => Err(UnknownValue::new("tier", other)),
        }
    }
}

/// Payment state. Only meaningful for [`Tier::Paid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment confirmation.
    Pending,
    /// Paid, or a free registration.
    Approved,
    /// Cancelled. Valid in storage; no admin action currently produces it.
    Cancelled,
}

impl PaymentStatus {
    /// Wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownValue::new("payment status", other)),
        }
    }
}

/// Self-declared gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
    /// Prefers not to say.
    Undisclosed,
}

impl Gender {
    /// Wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::Undisclosed => "undisclosed",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            "undisclosed" => Ok(Self::Undisclosed),
            other => Err(UnknownValue::new("gender", other)),
        }
    }
}

/// Annual company revenue bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RevenueBracket {
    /// Up to R$ 100k.
    #[serde(rename = "up-to-100k")]
    UpTo100k,
    /// R$ 100k to 500k.
    #[serde(rename = "100k-500k")]
    From100kTo500k,
    /// R$ 500k to 1M.
    #[serde(rename = "500k-1m")]
    From500kTo1m,
    /// R$ 1M to 5M.
    #[serde(rename = "1m-5m")]
    From1mTo5m,
    /// R$ 5M to 10M.
    #[serde(rename = "5m-10m")]
    From5mTo10m,
    /// Above R$ 10M.
    #[serde(rename = "above-10m")]
    Above10m,
    /// Not disclosed.
    #[serde(rename = "undisclosed")]
    Undisclosed,
}

impl RevenueBracket {
    const ALL: [Self; 7] = [
        Self::UpTo100k,
        Self::From100kTo500k,
        Self::From500kTo1m,
        Self::From1mTo5m,
        Self::From5mTo10m,
        Self::Above10m,
        Self::Undisclosed,
    ];

    /// Wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpTo100k => "up-to-100k",
            Self::From100kTo500k => "100k-500k",
            Self::From500kTo1m => "500k-1m",
            Self::From1mTo5m => "1m-5m",
            Self::From5mTo10m => "5m-10m",
            Self::Above10m => "above-10m",
            Self::Undisclosed => "undisclosed",
        }
    }

    /// Human-readable label used in exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo100k => "Up to R$ 100k",
            Self::From100kTo500k => "R$ 100k - 500k",
            Self::From500kTo1m => "R$ 500k - 1M",
            Self::From1mTo5m => "R$ 1M - 5M",
            Self::From5mTo10m => "R$ 5M - 10M",
            Self::Above10m => "Above R$ 10M",
            Self::Undisclosed => "Not disclosed",
        }
    }
}

impl FromStr for RevenueBracket {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| UnknownValue::new("revenue bracket", s))
    }
}

/// Business sector of the participant's company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    /// Technology.
    Technology,
    /// Retail.
    Retail,
    /// Services.
    Services,
    /// Industry.
    Industry,
    /// Healthcare.
    Healthcare,
    /// Education.
    Education,
    /// Finance.
    Finance,
    /// Agribusiness.
    Agribusiness,
    /// Anything else.
    Other,
}

impl Sector {
    const ALL: [Self; 9] = [
        Self::Technology,
        Self::Retail,
        Self::Services,
        Self::Industry,
        Self::Healthcare,
        Self::Education,
        Self::Finance,
        Self::Agribusiness,
        Self::Other,
    ];

    /// Wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Retail => "retail",
            Self::Services => "services",
            Self::Industry => "industry",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Finance => "finance",
            Self::Agribusiness => "agribusiness",
            Self::Other => "other",
        }
    }

    /// Human-readable label used in exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Retail => "Retail",
            Self::Services => "Services",
            Self::Industry => "Industry",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Finance => "Finance",
            Self::Agribusiness => "Agribusiness",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Sector {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sector| sector.as_str() == s)
            .ok_or_else(|| UnknownValue::new("sector", s))
    }
}

/// Federative-unit codes accepted as a participant's state.
pub const STATE_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// A registered attendee as held by the store and the registry.
///
/// `tax_id` and `phone` hold bare digits; masks are applied only when
/// rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Store-assigned identifier.
    pub id: ParticipantId,
    /// Full name.
    pub full_name: String,
    /// 11-digit tax id, digits only.
    pub tax_id: String,
    /// Lower-cased email address.
    pub email: String,
    /// 10–11 digit phone, digits only.
    pub phone: String,
    /// Birth date, if given.
    pub birth_date: Option<NaiveDate>,
    /// Gender, if given.
    pub gender: Option<Gender>,
    /// City.
    pub city: String,
    /// Upper-case state code.
    pub state: String,
    /// Company name, if given.
    pub company_name: Option<String>,
    /// Company revenue bracket, if given.
    pub revenue_bracket: Option<RevenueBracket>,
    /// Business sector, if given.
    pub sector: Option<Sector>,
    /// Registration tier (immutable).
    pub tier: Tier,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Store-assigned registration timestamp (immutable).
    pub registered_at: DateTime<Utc>,
    /// Whether an admin confirmed attendance.
    pub attendance_confirmed: bool,
}

impl Participant {
    /// Builds the stored record from a validated registration.
    #[must_use]
    pub fn from_new(id: ParticipantId, registered_at: DateTime<Utc>, new: NewParticipant) -> Self {
        Self {
            id,
            full_name: new.full_name,
            tax_id: new.tax_id,
            email: new.email,
            phone: new.phone,
            birth_date: new.birth_date,
            gender: new.gender,
            city: new.city,
            state: new.state,
            company_name: new.company_name,
            revenue_bracket: new.revenue_bracket,
            sector: new.sector,
            tier: new.tier,
            payment_status: new.payment_status,
            registered_at,
            attendance_confirmed: new.attendance_confirmed,
        }
    }

    /// Applies every field set in `patch`.
    pub fn apply(&mut self, patch: &ParticipantPatch) {
        if let Some(v) = &patch.full_name {
            self.full_name.clone_from(v);
        }
        if let Some(v) = &patch.email {
            self.email.clone_from(v);
        }
        if let Some(v) = &patch.phone {
            self.phone.clone_from(v);
        }
        if let Some(v) = patch.birth_date {
            self.birth_date = v;
        }
        if let Some(v) = patch.gender {
            self.gender = v;
        }
        if let Some(v) = &patch.city {
            self.city.clone_from(v);
        }
        if let Some(v) = &patch.state {
            self.state.clone_from(v);
        }
        if let Some(v) = &patch.company_name {
            self.company_name.clone_from(v);
        }
        if let Some(v) = patch.revenue_bracket {
            self.revenue_bracket = v;
        }
        if let Some(v) = patch.sector {
            self.sector = v;
        }
        if let Some(v) = patch.payment_status {
            self.payment_status = v;
        }
        if let Some(v) = patch.attendance_confirmed {
            self.attendance_confirmed = v;
        }
    }

    /// Status the payment toggle moves to, or `None` for free registrations.
    ///
    /// Approved flips back to pending; any other status becomes approved.
    #[must_use]
    pub const fn toggled_payment_status(&self) -> Option<PaymentStatus> {
        match (self.tier, self.payment_status) {
            (Tier::Free, _) => None,
            (Tier::Paid, PaymentStatus::Approved) => Some(PaymentStatus::Pending),
            (Tier::Paid, _) => Some(PaymentStatus::Approved),
        }
    }
}

/// A validated registration not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParticipant {
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
    /// Gender.
    pub gender: Option<Gender>,
    /// City.
    pub city: String,
    /// State code.
    pub state: String,
    /// Company name.
    pub company_name: Option<String>,
    /// Revenue bracket.
    pub revenue_bracket: Option<RevenueBracket>,
    /// Sector.
    pub sector: Option<Sector>,
    /// Tier.
    pub tier: Tier,
    /// Initial payment status.
    pub payment_status: PaymentStatus,
    /// Initial attendance flag (always `false` from the public form).
    pub attendance_confirmed: bool,
}

/// Partial update applied by admin actions. `None` leaves a field unchanged;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantPatch {
    /// New full name.
    pub full_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone digits.
    pub phone: Option<String>,
    /// New birth date.
    pub birth_date: Option<Option<NaiveDate>>,
    /// New gender.
    pub gender: Option<Option<Gender>>,
    /// New city.
    pub city: Option<String>,
    /// New state code.
    pub state: Option<String>,
    /// New company name.
    pub company_name: Option<Option<String>>,
    /// New revenue bracket.
    pub revenue_bracket: Option<Option<RevenueBracket>>,
    /// New sector.
    pub sector: Option<Option<Sector>>,
    /// New payment status.
    pub payment_status: Option<PaymentStatus>,
    /// New attendance flag.
    pub attendance_confirmed: Option<bool>,
}

impl ParticipantPatch {
    /// Patch touching only the payment status.
    #[must_use]
    pub fn payment(status: PaymentStatus) -> Self {
        Self {
            payment_status: Some(status),
            ..Self::default()
        }
    }

    /// Patch touching only the attendance flag.
    #[must_use]
    pub fn attendance(confirmed: bool) -> Self {
        Self {
            attendance_confirmed: Some(confirmed),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    /// Participant with the given name/tier registered `minutes` after a
    /// fixed origin.
    pub(crate) fn participant(name: &str, tier: Tier, minutes: i64) -> Participant {
        let origin = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single();
        let registered_at = origin.unwrap_or_default() + chrono::Duration::minutes(minutes);
        Participant {
            id: ParticipantId::new(),
            full_name: name.to_string(),
            tax_id: "52998224725".to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: "11988887777".to_string(),
            birth_date: None,
            gender: None,
            city: "Campinas".to_string(),
            state: "SP".to_string(),
            company_name: None,
            revenue_bracket: None,
            sector: None,
            tier,
            payment_status: tier.initial_payment_status(),
            registered_at,
            attendance_confirmed: false,
        }
    }
}
