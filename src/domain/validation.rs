//! Input validation for public registrations and admin profile edits.
//!
//! Validation runs before any store call and reports every offending field
//! at once so the caller can render each message next to its input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::participant::{
    Gender, NewParticipant, ParticipantPatch, RevenueBracket, STATE_CODES, Sector, Tier,
};
use super::{phone, tax_id};

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Input field name as submitted.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Public registration form. Tax id and phone may carry display masks;
/// optional fields may be blank.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegistrationForm {
    /// Full name.
    pub full_name: String,
    /// Tax id, masked or bare.
    pub tax_id: String,
    /// Email address.
    pub email: String,
    /// Phone, masked or bare.
    pub phone: String,
    /// ISO date `YYYY-MM-DD`.
    #[serde(default)]
    pub birth_date: Option<String>,
    /// One of `male`, `female`, `other`, `undisclosed`.
    #[serde(default)]
    pub gender: Option<String>,
    /// City.
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    /// Company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Revenue bracket wire name.
    #[serde(default)]
    pub revenue_bracket: Option<String>,
    /// Sector wire name.
    #[serde(default)]
    pub sector: Option<String>,
}

/// Admin edit of a participant's profile. Absent fields stay unchanged.
///
/// Optional fields sent as `null` or blank are cleared.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileEdit {
    /// Full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone, masked or bare.
    #[serde(default)]
    pub phone: Option<String>,
    /// ISO date `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub birth_date: Option<Option<String>>,
    /// Gender wire name.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub gender: Option<Option<String>>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State code.
    #[serde(default)]
    pub state: Option<String>,
    /// Company name.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub company_name: Option<Option<String>>,
    /// Revenue bracket wire name.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub revenue_bracket: Option<Option<String>>,
    /// Sector wire name.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub sector: Option<Option<String>>,
}

/// Validates a public registration for `tier`.
///
/// `today` bounds the birth date.
///
/// # Errors
///
/// Returns every [`FieldError`] found.
pub fn validate_registration(
    form: &RegistrationForm,
    tier: Tier,
    today: NaiveDate,
) -> Result<NewParticipant, Vec<FieldError>> {
    let mut errors = Vec::new();

    let full_name = required(&mut errors, "full_name", &form.full_name);
    let tax_id = check_tax_id(&mut errors, &form.tax_id);
    let email = check_email(&mut errors, &form.email);
    let phone = check_phone(&mut errors, &form.phone);
    let city = required(&mut errors, "city", &form.city);
    let state = check_state(&mut errors, &form.state);
    let birth_date = optional(&form.birth_date).and_then(|v| check_birth_date(&mut errors, v, today));
    let gender = parse_optional::<Gender>(&mut errors, "gender", &form.gender);
    let company_name = optional(&form.company_name).map(str::to_string);
    let revenue_bracket =
        parse_optional::<RevenueBracket>(&mut errors, "revenue_bracket", &form.revenue_bracket);
    let sector = parse_optional::<Sector>(&mut errors, "sector", &form.sector);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewParticipant {
        full_name: full_name.unwrap_or_default(),
        tax_id: tax_id.unwrap_or_default(),
        email: email.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        birth_date,
        gender,
        city: city.unwrap_or_default(),
        state: state.unwrap_or_default(),
        company_name,
        revenue_bracket,
        sector,
        tier,
        payment_status: tier.initial_payment_status(),
        attendance_confirmed: false,
    })
}

/// Validates an admin profile edit with the same field rules as
/// registration.
///
/// # Errors
///
/// Returns every [`FieldError`] found.
pub fn validate_profile_edit(
    edit: &ProfileEdit,
    today: NaiveDate,
) -> Result<ParticipantPatch, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut patch = ParticipantPatch::default();

    if let Some(v) = &edit.full_name {
        patch.full_name = required(&mut errors, "full_name", v);
    }
    if let Some(v) = &edit.email {
        patch.email = check_email(&mut errors, v);
    }
    if let Some(v) = &edit.phone {
        patch.phone = check_phone(&mut errors, v);
    }
    if let Some(v) = &edit.birth_date {
        patch.birth_date = match optional(v) {
            Some(raw) => check_birth_date(&mut errors, raw, today).map(Some),
            None => Some(None),
        };
    }
    if let Some(v) = &edit.gender {
        patch.gender = clearable::<Gender>(&mut errors, "gender", v);
    }
    if let Some(v) = &edit.city {
        patch.city = required(&mut errors, "city", v);
    }
    if let Some(v) = &edit.state {
        patch.state = check_state(&mut errors, v);
    }
    if let Some(v) = &edit.company_name {
        patch.company_name = Some(optional(v).map(str::to_string));
    }
    if let Some(v) = &edit.revenue_bracket {
        patch.revenue_bracket = clearable::<RevenueBracket>(&mut errors, "revenue_bracket", v);
    }
    if let Some(v) = &edit.sector {
        patch.sector = clearable::<Sector>(&mut errors, "sector", v);
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

/// Trims and lower-cases an email, returning `None` if it is not
/// plausibly deliverable.
#[must_use]
pub fn normalize_email(input: &str) -> Option<String> {
    let email = input.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    let plausible = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    plausible.then_some(email)
}

fn required(errors: &mut Vec<FieldError>, field: &str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "required"));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn check_tax_id(errors: &mut Vec<FieldError>, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        errors.push(FieldError::new("tax_id", "required"));
        return None;
    }
    if !tax_id::is_valid(value) {
        errors.push(FieldError::new("tax_id", "invalid tax id"));
        return None;
    }
    Some(tax_id::strip_mask(value))
}

fn check_email(errors: &mut Vec<FieldError>, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        errors.push(FieldError::new("email", "required"));
        return None;
    }
    let normalized = normalize_email(value);
    if normalized.is_none() {
        errors.push(FieldError::new("email", "invalid email address"));
    }
    normalized
}

fn check_phone(errors: &mut Vec<FieldError>, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        errors.push(FieldError::new("phone", "required"));
        return None;
    }
    if !phone::is_valid(value) {
        errors.push(FieldError::new(
            "phone",
            "phone must have 10 or 11 digits including area code",
        ));
        return None;
    }
    Some(tax_id::strip_mask(value))
}

fn check_state(errors: &mut Vec<FieldError>, value: &str) -> Option<String> {
    let code = value.trim().to_uppercase();
    if code.is_empty() {
        errors.push(FieldError::new("state", "required"));
        return None;
    }
    if !STATE_CODES.contains(&code.as_str()) {
        errors.push(FieldError::new("state", "unknown state code"));
        return None;
    }
    Some(code)
}

fn check_birth_date(
    errors: &mut Vec<FieldError>,
    value: &str,
    today: NaiveDate,
) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) if date <= today => Some(date),
        Ok(_) => {
            errors.push(FieldError::new("birth_date", "birth date is in the future"));
            None
        }
        Err(_) => {
            errors.push(FieldError::new("birth_date", "expected YYYY-MM-DD"));
            None
        }
    }
}

fn parse_optional<T: std::str::FromStr>(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &Option<String>,
) -> Option<T> {
    let raw = optional(value)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(FieldError::new(field, format!("unknown value: {raw}")));
            None
        }
    }
}

/// `Some(None)` for a blank value, `None` if it failed to parse.
fn clearable<T: std::str::FromStr>(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &Option<String>,
) -> Option<Option<T>> {
    if optional(value).is_none() {
        return Some(None);
    }
    parse_optional(errors, field, value).map(Some)
}

/// Keeps an explicit `null` distinct from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
