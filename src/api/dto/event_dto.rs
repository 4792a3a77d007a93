//! Event configuration payloads.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::EventConfiguration;
use crate::domain::color::ResolvedTheme;

/// Event configuration together with its resolved theme.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    /// Stored configuration; colors as entered.
    pub event: EventConfiguration,
    /// Every theme color as hex.
    pub theme: ResolvedTheme,
}

/// Offer summary shown on the landing page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OfferSummary {
    /// Offer title.
    pub title: String,
    /// Whether registrations for this tier are open.
    pub available: bool,
    /// Price; absent for the free tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Response body for `GET /`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LandingResponse {
    /// Event name.
    pub name: String,
    /// Display date.
    pub date: String,
    /// Venue.
    pub location: String,
    /// Display time range.
    pub time: String,
    /// Free tier offer.
    pub free: OfferSummary,
    /// Paid tier offer.
    pub paid: OfferSummary,
    /// Resolved theme colors.
    pub theme: ResolvedTheme,
}

impl LandingResponse {
    /// Builds the summary from the current configuration.
    #[must_use]
    pub fn new(event: EventConfiguration, theme: ResolvedTheme) -> Self {
        Self {
            free: OfferSummary {
                title: event.free_tier.title,
                available: event.free_tier.available,
                price: None,
            },
            paid: OfferSummary {
                title: event.paid_tier.title,
                available: event.paid_tier.available,
                price: Some(event.paid_tier.price),
            },
            name: event.name,
            date: event.date,
            location: event.location,
            time: event.time,
            theme,
        }
    }
}
