//! Singleton event configuration shown by the public site.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::color::Theme;
use super::participant::Tier;
use super::validation::FieldError;

/// Contact block shown in the footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    /// Contact email.
    pub email: String,
    /// Contact phone, free text.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

/// Social profile URLs. Blank means "not shown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SocialLinks {
    /// LinkedIn URL.
    pub linkedin: String,
    /// Instagram URL.
    pub instagram: String,
    /// Twitter/X URL.
    pub twitter: String,
    /// Facebook URL.
    pub facebook: String,
    /// YouTube URL.
    pub youtube: String,
}

impl SocialLinks {
    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("social.linkedin", &self.linkedin),
            ("social.instagram", &self.instagram),
            ("social.twitter", &self.twitter),
            ("social.facebook", &self.facebook),
            ("social.youtube", &self.youtube),
        ]
    }
}

/// Free registration offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TierOffer {
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Ordered benefit lines.
    pub benefits: Vec<String>,
    /// Whether signups are open.
    pub available: bool,
}

/// Paid registration offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaidTierOffer {
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Ordered benefit lines.
    pub benefits: Vec<String>,
    /// Whether signups are open.
    pub available: bool,
    /// Ticket price, non-negative.
    pub price: f64,
}

/// The event's descriptive, pricing and theme settings.
///
/// Exactly one record exists; it is replaced wholesale on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventConfiguration {
    /// Event name.
    pub name: String,
    /// Date, free text (e.g. `"March 15, 2025"`).
    pub date: String,
    /// Venue.
    pub location: String,
    /// Time of day, free text.
    pub time: String,
    /// Long description.
    pub description: String,
    /// Participant-count blurb (e.g. `"500+ Participants"`).
    pub participants_blurb: String,
    /// Ordered agenda lines.
    pub schedule: Vec<String>,
    /// Hero image URL.
    pub image_url: String,
    /// Contact block.
    pub contact: Contact,
    /// Social links.
    #[serde(default)]
    pub social: SocialLinks,
    /// Free registration offer.
    pub free_tier: TierOffer,
    /// Paid registration offer.
    pub paid_tier: PaidTierOffer,
    /// Color theme.
    #[serde(default)]
    pub theme: Theme,
}

impl EventConfiguration {
    /// Whether signups for `tier` are open.
    #[must_use]
    pub const fn is_available(&self, tier: Tier) -> bool {
        match tier {
            Tier::Free => self.free_tier.available,
            Tier::Paid => self.paid_tier.available,
        }
    }

    /// Checks the fields an admin save must satisfy.
    ///
    /// # Errors
    ///
    /// Returns every [`FieldError`] found.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "required"));
        }
        if self.date.trim().is_empty() {
            errors.push(FieldError::new("date", "required"));
        }
        if !self.paid_tier.price.is_finite() || self.paid_tier.price < 0.0 {
            errors.push(FieldError::new(
                "paid_tier.price",
                "price must be a non-negative number",
            ));
        }
        if !is_blank_or_http(&self.image_url) {
            errors.push(FieldError::new("image_url", "expected an http(s) URL"));
        }
        for (field, url) in self.social.entries() {
            if !is_blank_or_http(url) {
                errors.push(FieldError::new(field, "expected an http(s) URL"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_blank_or_http(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url.starts_with("https://") || url.starts_with("http://")
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for EventConfiguration {
    /// The record created on first read of an empty collection.
    fn default() -> Self {
        Self {
            name: "Event X - Digital Transformation 2025".to_string(),
            date: "March 15, 2025".to_string(),
            location: "Tech Hub Convention Center".to_string(),
            time: "09:00 - 18:00".to_string(),
            description: "The biggest technology and innovation event of the year! Join \
                          specialists, entrepreneurs and industry leaders to explore the latest \
                          trends in digital transformation."
                .to_string(),
            participants_blurb: "500+ Participants".to_string(),
            schedule: lines(&[
                "09:00 - 10:00 | Check-in and Welcome Coffee",
                "10:00 - 11:30 | Keynote: The Future of AI",
                "11:30 - 12:00 | Coffee Break",
                "12:00 - 13:30 | Panel: Innovation in Brazil",
                "13:30 - 14:30 | Lunch",
                "14:30 - 16:00 | Hands-on Workshops",
                "16:00 - 16:30 | Networking",
                "16:30 - 18:00 | Closing and Awards",
            ]),
            image_url: "https://images.pexels.com/photos/2774556/pexels-photo-2774556.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1".to_string(),
            contact: Contact {
                email: "contact@event.com".to_string(),
                phone: "(11) 9999-9999".to_string(),
                address: "Tech Hub Convention Center".to_string(),
            },
            social: SocialLinks {
                linkedin: "https://linkedin.com/company/event-x".to_string(),
                instagram: "https://instagram.com/event_x".to_string(),
                twitter: "https://twitter.com/event_x".to_string(),
                facebook: "https://facebook.com/event.x".to_string(),
                youtube: "https://youtube.com/@event-x".to_string(),
            },
            free_tier: TierOffer {
                title: "Free Registration".to_string(),
                description: "Full access to the event with every talk and workshop.".to_string(),
                benefits: lines(&[
                    "Access to every talk",
                    "Digital material",
                    "Attendance certificate",
                    "Coffee breaks",
                ]),
                available: true,
            },
            paid_tier: PaidTierOffer {
                title: "Premium Registration".to_string(),
                description: "Every benefit plus exclusive perks for the complete experience."
                    .to_string(),
                benefits: lines(&[
                    "Everything in the free registration",
                    "Lunch included",
                    "Exclusive event kit",
                    "VIP networking access",
                    "Mentoring session",
                ]),
                available: true,
                price: 97.0,
            },
            theme: Theme::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_and_open() {
        let config = EventConfiguration::default();
        assert!(config.validate().is_ok());
        assert!(config.is_available(Tier::Free));
        assert!(config.is_available(Tier::Paid));
        assert_eq!(config.schedule.len(), 8);
    }

    #[test]
    fn rejects_negative_price_and_bad_urls() {
        let mut config = EventConfiguration::default();
        config.paid_tier.price = -1.0;
        config.social.youtube = "youtube.com/@x".to_string();
        config.name = String::new();
        let Err(errors) = config.validate() else {
            panic!("expected validation errors");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "paid_tier.price", "social.youtube"]);
    }

    #[test]
    fn blank_social_links_are_fine() {
        let mut config = EventConfiguration::default();
        config.social = SocialLinks::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn theme_and_social_default_when_absent() {
        let mut json = serde_json::to_value(EventConfiguration::default()).unwrap_or_default();
        if let Some(obj) = json.as_object_mut() {
            obj.remove("theme");
            obj.remove("social");
        }
        let Ok(config) = serde_json::from_value::<EventConfiguration>(json) else {
            panic!("config without theme should deserialize");
        };
        assert_eq!(config.theme, Theme::default());
        assert_eq!(config.social, SocialLinks::default());
    }
}
