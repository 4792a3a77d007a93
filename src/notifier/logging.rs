//! Notifier that only logs, used when email delivery is not configured.

use async_trait::async_trait;

use super::{Notifier, NotifyError, Recipient, TemplateContext};

/// Records each send as a `tracing` event and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &Recipient, context: &TemplateContext) -> Result<(), NotifyError> {
        tracing::info!(
            to = %recipient.email,
            name = %recipient.name,
            event = %context.event_name,
            "notification delivery not configured; message logged only"
        );
        Ok(())
    }
}
