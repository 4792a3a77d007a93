//! Bulk notification to confirmed attendees.
//!
//! Messages go out strictly one at a time with a fixed pause between
//! consecutive sends. A failed send is recorded and the batch moves on.
//! The batch runs on its own task so it completes even if the caller
//! stops waiting.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

use super::event_config_service::EventConfigService;
use crate::domain::validation::FieldError;
use crate::domain::{Participant, ParticipantId, ParticipantRegistry};
use crate::error::GatewayError;
use crate::notifier::{Notifier, NotifyError, Recipient, TemplateContext};

/// Outcome of a bulk send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct BulkSendReport {
    /// Messages delivered.
    pub success_count: usize,
    /// Messages that failed.
    pub failed_count: usize,
    /// One line per failure, in send order.
    pub errors: Vec<String>,
}

/// Sends the event confirmation message to selected attendees.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
    registry: Arc<ParticipantRegistry>,
    events: Arc<EventConfigService>,
    delay: Duration,
}

impl NotificationService {
    /// Creates a service pausing `delay` between consecutive sends.
    #[must_use]
    pub fn new(
        notifier: Arc<dyn Notifier>,
        registry: Arc<ParticipantRegistry>,
        events: Arc<EventConfigService>,
        delay: Duration,
    ) -> Self {
        Self {
            notifier,
            registry,
            events,
            delay,
        }
    }

    /// Participants with confirmed attendance, in store order.
    pub async fn eligible(&self) -> Vec<Participant> {
        self.registry
            .snapshot()
            .await
            .into_iter()
            .filter(|p| p.attendance_confirmed)
            .collect()
    }

    /// Sends the confirmation message to the selected attendees.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for an empty selection or an id that
    ///   is not a confirmed attendee.
    /// - [`GatewayError::NotificationUnavailable`] if every send failed
    ///   because the delivery service was unreachable.
    pub async fn send_confirmations(&self, ids: &[ParticipantId]) -> Result<BulkSendReport, GatewayError> {
        let recipients = self.select(ids).await?;
        let config = self.events.current().await;
        let context = TemplateContext {
            event_name: config.name,
            date: config.date,
            location: config.location,
            time: config.time,
        };
        self.send_bulk(&recipients, &context).await
    }

    /// Sends one message per recipient, sequentially, on a spawned task.
    ///
    /// Dropping the returned future does not cancel the batch.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::NotificationUnavailable`] only when every attempt
    ///   failed with [`NotifyError::Unavailable`].
    /// - [`GatewayError::Internal`] if the batch task panicked.
    pub async fn send_bulk(
        &self,
        recipients: &[Recipient],
        context: &TemplateContext,
    ) -> Result<BulkSendReport, GatewayError> {
        let batch = run_batch(
            Arc::clone(&self.notifier),
            recipients.to_vec(),
            context.clone(),
            self.delay,
        );
        tokio::spawn(batch)
            .await
            .map_err(|e| GatewayError::Internal(format!("notification batch aborted: {e}")))?
    }

    async fn select(&self, ids: &[ParticipantId]) -> Result<Vec<Recipient>, GatewayError> {
        if ids.is_empty() {
            return Err(GatewayError::field(
                "participant_ids",
                "select at least one recipient",
            ));
        }

        let eligible = self.eligible().await;
        let mut seen = HashSet::new();
        let mut recipients = Vec::new();
        let mut errors = Vec::new();
        for id in ids.iter().filter(|id| seen.insert(**id)) {
            match eligible.iter().find(|p| p.id == *id) {
                Some(p) => recipients.push(Recipient {
                    email: p.email.clone(),
                    name: p.full_name.clone(),
                }),
                None => errors.push(FieldError::new(
                    "participant_ids",
                    format!("{id} is not a confirmed attendee"),
                )),
            }
        }

        if errors.is_empty() {
            Ok(recipients)
        } else {
            Err(GatewayError::Validation(errors))
        }
    }
}

async fn run_batch(
    notifier: Arc<dyn Notifier>,
    recipients: Vec<Recipient>,
    context: TemplateContext,
    delay: Duration,
) -> Result<BulkSendReport, GatewayError> {
    let mut report = BulkSendReport::default();
    let mut all_unavailable = true;
    let mut last_unavailable = String::new();

    for (i, recipient) in recipients.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }
        match notifier.send(recipient, &context).await {
            Ok(()) => {
                report.success_count += 1;
                all_unavailable = false;
            }
            Err(err) => {
                tracing::warn!(to = %recipient.email, error = %err, "notification failed");
                match &err {
                    NotifyError::Unavailable(detail) => last_unavailable.clone_from(detail),
                    NotifyError::Rejected(_) => all_unavailable = false,
                }
                report.failed_count += 1;
                report.errors.push(format!(
                    "failed to send to {} ({}): {err}",
                    recipient.name, recipient.email
                ));
            }
        }
    }

    if !recipients.is_empty() && all_unavailable {
        return Err(GatewayError::NotificationUnavailable(last_unavailable));
    }

    tracing::info!(
        sent = report.success_count,
        failed = report.failed_count,
        "bulk notification finished"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::domain::participant::Tier;
    use crate::domain::participant::fixtures::participant;
    use crate::persistence::MemoryStore;

    /// Replies per email address; unknown addresses succeed.
    #[derive(Debug, Default)]
    struct ScriptedNotifier {
        replies: Vec<(String, NotifyError)>,
        sent_at: Mutex<Vec<(String, Instant)>>,
    }

    #[async_trait]
    impl Notifier for ScriptedNotifier {
        async fn send(&self, recipient: &Recipient, _: &TemplateContext) -> Result<(), NotifyError> {
            if let Ok(mut log) = self.sent_at.lock() {
                log.push((recipient.email.clone(), Instant::now()));
            }
            match self.replies.iter().find(|(email, _)| *email == recipient.email) {
                Some((_, err)) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn recipient(name: &str) -> Recipient {
        Recipient {
            email: format!("{}@x.com", name.to_lowercase()),
            name: name.to_string(),
        }
    }

    fn context() -> TemplateContext {
        TemplateContext {
            event_name: "Event X".to_string(),
            date: "March 15, 2025".to_string(),
            location: "Hall".to_string(),
            time: "09:00".to_string(),
        }
    }

    fn service(notifier: Arc<ScriptedNotifier>, registry: Arc<ParticipantRegistry>) -> NotificationService {
        NotificationService::new(
            notifier,
            registry,
            Arc::new(EventConfigService::new(Arc::new(MemoryStore::new()))),
            Duration::from_secs(2),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn sends_sequentially_with_delay_between() {
        let notifier = Arc::new(ScriptedNotifier::default());
        let svc = service(Arc::clone(&notifier), Arc::new(ParticipantRegistry::new()));
        let recipients = [recipient("Ana"), recipient("Bia"), recipient("Caio")];

        let started = Instant::now();
        let Ok(report) = svc.send_bulk(&recipients, &context()).await else {
            panic!("batch failed");
        };
        assert_eq!(report.success_count, 3);
        assert!(started.elapsed() < Duration::from_secs(5));

        let Ok(log) = notifier.sent_at.lock() else {
            panic!("poisoned");
        };
        let times: Vec<Instant> = log.iter().map(|(_, at)| *at).collect();
        assert_eq!(times.len(), 3);
        assert!(times.first().is_some_and(|t| *t - started < Duration::from_millis(1)));
        for pair in times.windows(2) {
            let [a, b] = pair else {
                panic!("window of two");
            };
            assert!(*b - *a >= Duration::from_secs(2));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_collected_and_batch_continues() {
        let notifier = Arc::new(ScriptedNotifier {
            replies: vec![(
                "bia@x.com".to_string(),
                NotifyError::Rejected("bad address".to_string()),
            )],
            ..ScriptedNotifier::default()
        });
        let svc = service(notifier, Arc::new(ParticipantRegistry::new()));
        let recipients = [recipient("Ana"), recipient("Bia"), recipient("Caio")];

        let Ok(report) = svc.send_bulk(&recipients, &context()).await else {
            panic!("batch failed");
        };
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(
            report.errors,
            ["failed to send to Bia (bia@x.com): message rejected: bad address"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn total_outage_fails_the_batch() {
        let down = |email: &str| (email.to_string(), NotifyError::Unavailable("timeout".to_string()));
        let notifier = Arc::new(ScriptedNotifier {
            replies: vec![down("ana@x.com"), down("bia@x.com")],
            ..ScriptedNotifier::default()
        });
        let svc = service(notifier, Arc::new(ParticipantRegistry::new()));
        assert!(matches!(
            svc.send_bulk(&[recipient("Ana"), recipient("Bia")], &context()).await,
            Err(GatewayError::NotificationUnavailable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn partial_outage_still_reports() {
        let notifier = Arc::new(ScriptedNotifier {
            replies: vec![(
                "ana@x.com".to_string(),
                NotifyError::Unavailable("timeout".to_string()),
            )],
            ..ScriptedNotifier::default()
        });
        let svc = service(notifier, Arc::new(ParticipantRegistry::new()));
        let Ok(report) = svc
            .send_bulk(&[recipient("Ana"), recipient("Bia")], &context())
            .await
        else {
            panic!("partial outage should still report");
        };
        assert_eq!((report.success_count, report.failed_count), (1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_batch_still_reaches_everyone() {
        let notifier = Arc::new(ScriptedNotifier::default());
        let svc = NotificationService::new(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::new(ParticipantRegistry::new()),
            Arc::new(EventConfigService::new(Arc::new(MemoryStore::new()))),
            Duration::from_millis(200),
        );
        let recipients = [
            recipient("Ana"),
            recipient("Bia"),
            recipient("Caio"),
            recipient("Davi"),
        ];

        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            svc.send_bulk(&recipients, &context()),
        )
        .await;
        assert!(waited.is_err());

        tokio::time::sleep(Duration::from_secs(1)).await;
        let Ok(log) = notifier.sent_at.lock() else {
            panic!("poisoned");
        };
        assert_eq!(log.len(), 4);
    }

    #[tokio::test]
    async fn only_confirmed_attendees_are_selectable() {
        let registry = Arc::new(ParticipantRegistry::new());
        let mut confirmed = participant("Ana", Tier::Free, 0);
        confirmed.attendance_confirmed = true;
        let unconfirmed = participant("Bia", Tier::Paid, 1);
        let (ok_id, bad_id) = (confirmed.id, unconfirmed.id);
        registry.replace_all(vec![confirmed, unconfirmed]).await;

        let svc = service(Arc::new(ScriptedNotifier::default()), registry);
        assert_eq!(svc.eligible().await.len(), 1);

        assert!(matches!(
            svc.send_confirmations(&[]).await,
            Err(GatewayError::Validation(_))
        ));
        assert!(matches!(
            svc.send_confirmations(&[ok_id, bad_id]).await,
            Err(GatewayError::Validation(fields)) if fields.len() == 1
        ));
        let Ok(report) = svc.send_confirmations(&[ok_id, ok_id]).await else {
            panic!("send failed");
        };
        assert_eq!(report.success_count, 1);
    }
}
