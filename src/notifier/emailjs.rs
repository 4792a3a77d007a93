//! EmailJS REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{Notifier, NotifyError, Recipient, TemplateContext};

/// Default EmailJS send endpoint.
pub const DEFAULT_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS account settings.
#[derive(Clone)]
pub struct EmailJsConfig {
    /// Send endpoint.
    pub api_url: String,
    /// EmailJS service id.
    pub service_id: String,
    /// EmailJS template id.
    pub template_id: String,
    /// Public key (`user_id`).
    pub public_key: String,
    /// Private access token, if the account requires one.
    pub private_key: Option<String>,
}

impl std::fmt::Debug for EmailJsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsConfig")
            .field("api_url", &self.api_url)
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    name: &'a str,
    email: &'a str,
    event_name: &'a str,
    date: &'a str,
    location: &'a str,
    time: &'a str,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

/// Sends templated email through EmailJS.
#[derive(Debug, Clone)]
pub struct EmailJsNotifier {
    client: Client,
    config: EmailJsConfig,
}

impl EmailJsNotifier {
    /// Creates a client with a 10 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Unavailable`] if the HTTP client cannot be
    /// built.
    pub fn new(config: EmailJsConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Unavailable(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn request<'a>(&'a self, recipient: &'a Recipient, context: &'a TemplateContext) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: TemplateParams {
                name: &recipient.name,
                email: &recipient.email,
                event_name: &context.event_name,
                date: &context.date,
                location: &context.location,
                time: &context.time,
            },
        }
    }
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    async fn send(&self, recipient: &Recipient, context: &TemplateContext) -> Result<(), NotifyError> {
        let res = self
            .client
            .post(&self.config.api_url)
            .json(&self.request(recipient, context))
            .send()
            .await
            .map_err(|e| NotifyError::Unavailable(e.to_string()))?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        let detail = format!("{status}: {body}");
        if status.is_server_error() {
            Err(NotifyError::Unavailable(detail))
        } else {
            Err(NotifyError::Rejected(detail))
        }
    }
}
