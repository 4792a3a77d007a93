//! Router-level tests: the full Axum app over the in-memory store.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use signup_gateway::api::build_router;
use signup_gateway::app_state::{AppState, Stores};
use signup_gateway::domain::CredentialHasher;
use signup_gateway::notifier::{Notifier, NotifyError, Recipient, TemplateContext};
use signup_gateway::persistence::MemoryStore;

/// Records every recipient; addresses listed in `reject` fail.
#[derive(Debug, Default)]
struct ScriptedNotifier {
    reject: Vec<String>,
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for ScriptedNotifier {
    async fn send(&self, recipient: &Recipient, context: &TemplateContext) -> Result<(), NotifyError> {
        assert!(!context.event_name.is_empty());
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(recipient.email.clone());
        }
        if self.reject.contains(&recipient.email) {
            return Err(NotifyError::Rejected("mailbox full".to_string()));
        }
        Ok(())
    }
}

struct TestApp {
    router: Router,
    notifier: Arc<ScriptedNotifier>,
}

async fn app_with(notifier: ScriptedNotifier) -> TestApp {
    app_with_delay(notifier, Duration::ZERO).await
}

async fn app_with_delay(notifier: ScriptedNotifier, send_delay: Duration) -> TestApp {
    let Ok(hasher) = CredentialHasher::new(8, 1) else {
        panic!("hash params rejected");
    };
    let notifier = Arc::new(notifier);
    let state = AppState::new(
        Stores::single(Arc::new(MemoryStore::new())),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        hasher,
        chrono::Duration::hours(8),
        send_delay,
    );
    if state.load().await.is_err() {
        panic!("initial load failed");
    }
    TestApp {
        router: build_router().with_state(state),
        notifier,
    }
}

async fn app() -> TestApp {
    app_with(ScriptedNotifier::default()).await
}

impl TestApp {
    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, bytes) = self.raw(method, uri, token, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let Ok(request) = builder.body(body) else {
            panic!("bad request");
        };
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status();
        let headers = response.headers().clone();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        (status, headers, bytes.to_vec())
    }

    async fn login(&self) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/admin/auth/login",
                None,
                Some(json!({"email": "admin@event.com", "password": "s3cret"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let Some(token) = body["token"].as_str() else {
            panic!("no token in {body}");
        };
        token.to_string()
    }

    async fn register(&self, tier: &str, name: &str, city: &str) -> String {
        let email = format!("{}@mail.com", name.to_lowercase().replace(' ', "."));
        let (status, body) = self
            .call(
                Method::POST,
                &format!("/api/v1/registrations/{tier}"),
                None,
                Some(form(name, &email, city)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let Some(id) = body["id"].as_str() else {
            panic!("no id in {body}");
        };
        id.to_string()
    }
}

fn form(name: &str, email: &str, city: &str) -> Value {
    json!({
        "full_name": name,
        "tax_id": "529.982.247-25",
        "email": email,
        "phone": "(11) 98888-7777",
        "city": city,
        "state": "sp",
    })
}

#[tokio::test]
async fn unknown_routes_redirect_home() {
    let app = app().await;
    let (status, headers, _) = app.raw(Method::GET, "/no/such/page", None, None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(LOCATION).and_then(|v| v.to_str().ok()), Some("/"));
}

#[tokio::test]
async fn landing_and_event_are_public() {
    let app = app().await;
    let (status, body) = app.call(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid"]["price"], json!(97.0));
    assert_eq!(body["theme"]["primary"], json!("#9333ea"));

    let (status, body) = app.call(Method::GET, "/api/v1/event", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["theme"]["primary"], json!("purple"));
}

#[tokio::test]
async fn admin_endpoints_require_a_session() {
    let app = app().await;
    for (method, uri) in [
        (Method::GET, "/api/v1/admin/participants"),
        (Method::GET, "/api/v1/admin/participants/stats"),
        (Method::GET, "/api/v1/admin/notifications/recipients"),
        (Method::GET, "/api/v1/admin/auth/session"),
    ] {
        let (status, body) = app.call(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"]["code"], json!(2002));
    }

    let (status, _) = app
        .call(
            Method::GET,
            "/api/v1/admin/participants",
            Some("0b6f1a56-3d0f-4bb8-9d4e-6f3c1f9b2a11"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn first_login_bootstraps_then_verifies() {
    let app = app().await;
    let (_, body) = app.call(Method::GET, "/api/v1/admin/auth/first-user", None, None).await;
    assert_eq!(body["first_user"], json!(true));

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/admin/auth/login",
            None,
            Some(json!({"email": " Admin@Event.com ", "password": "s3cret"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], json!("bootstrapped"));
    assert_eq!(body["email"], json!("admin@event.com"));

    let (_, body) = app.call(Method::GET, "/api/v1/admin/auth/first-user", None, None).await;
    assert_eq!(body["first_user"], json!(false));

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/admin/auth/login",
            None,
            Some(json!({"email": "admin@event.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], json!("invalid email or password"));

    let token = app.login().await;
    let (status, body) = app
        .call(Method::GET, "/api/v1/admin/auth/session", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], json!("admin@event.com"));

    let (status, _) = app
        .call(Method::POST, "/api/v1/admin/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .call(Method::GET, "/api/v1/admin/auth/session", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_validates_and_sets_payment() {
    let app = app().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/registrations/paid",
            None,
            Some(form("Ana Lima", "ana@mail.com", "Campinas")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["payment_status"], json!("pending"));
    assert_eq!(body["tax_id"], json!("52998224725"));
    assert_eq!(body["tax_id_display"], json!("529.982.247-25"));
    assert_eq!(body["state"], json!("SP"));

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/registrations/free",
            None,
            Some(form("Bia", "bia@mail.com", "Campinas")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["payment_status"], json!("approved"));

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/registrations/vip",
            None,
            Some(form("Caio", "caio@mail.com", "Campinas")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad = form("Dora", "not-an-email", "Campinas");
    bad["tax_id"] = json!("111.111.111-11");
    let (status, body) = app
        .call(Method::POST, "/api/v1/registrations/free", None, Some(bad))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let Some(fields) = body["error"]["fields"].as_array() else {
        panic!("no field errors in {body}");
    };
    let names: Vec<&str> = fields.iter().filter_map(|f| f["field"].as_str()).collect();
    assert!(names.contains(&"tax_id"));
    assert!(names.contains(&"email"));
}

#[tokio::test]
async fn closed_tier_rejects_registration() {
    let app = app().await;
    let token = app.login().await;
    let (_, body) = app.call(Method::GET, "/api/v1/event", None, None).await;
    let mut event = body["event"].clone();
    event["paid_tier"]["available"] = json!(false);
    let (status, _) = app
        .call(Method::PUT, "/api/v1/admin/event", Some(&token), Some(event))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/registrations/paid",
            None,
            Some(form("Ana", "ana@mail.com", "Campinas")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!(2004));
}

#[tokio::test]
async fn invalid_event_save_is_rejected() {
    let app = app().await;
    let token = app.login().await;
    let (_, body) = app.call(Method::GET, "/api/v1/event", None, None).await;
    let mut event = body["event"].clone();
    event["paid_tier"]["price"] = json!(-1.0);
    let (status, _) = app
        .call(Method::PUT, "/api/v1/admin/event", Some(&token), Some(event))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.call(Method::GET, "/api/v1/event", None, None).await;
    assert_eq!(body["event"]["paid_tier"]["price"], json!(97.0));
}

#[tokio::test]
async fn out_of_range_page_is_ignored() {
    let app = app().await;
    for i in 0..15 {
        let tier = if i < 5 { "free" } else { "paid" };
        app.register(tier, &format!("Person {i:02}"), "Campinas").await;
    }
    let token = app.login().await;

    let (status, body) = app
        .call(
            Method::PATCH,
            "/api/v1/admin/participants/view",
            Some(&token),
            Some(json!({"page_size": 5, "page": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_pages"], json!(3));
    assert_eq!(body["pagination"]["page"], json!(3));
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));

    let (_, body) = app
        .call(
            Method::PATCH,
            "/api/v1/admin/participants/view",
            Some(&token),
            Some(json!({"page": 4})),
        )
        .await;
    assert_eq!(body["pagination"]["page"], json!(3));

    let (status, _) = app
        .call(
            Method::PATCH,
            "/api/v1/admin/participants/view",
            Some(&token),
            Some(json!({"page_size": 7})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .call(
            Method::PATCH,
            "/api/v1/admin/participants/view",
            Some(&token),
            Some(json!({"search": "person 1", "sort": "name"})),
        )
        .await;
    assert_eq!(body["pagination"]["page"], json!(1));
    assert_eq!(body["pagination"]["total_items"], json!(5));
    assert_eq!(body["data"][0]["full_name"], json!("Person 10"));

    // View state lives in the session, so a plain list keeps it.
    let (_, body) = app
        .call(Method::GET, "/api/v1/admin/participants", Some(&token), None)
        .await;
    assert_eq!(body["view"]["search"], json!("person 1"));
    assert_eq!(body["view"]["page_size"], json!(5));
}

#[tokio::test]
async fn export_quotes_embedded_commas() {
    let app = app().await;
    app.register("free", "Ana", "Campinas").await;
    app.register("paid", "Bia", "São Paulo, Centro").await;
    app.register("free", "Caio", "Santos").await;
    let token = app.login().await;

    let (status, headers, bytes) = app
        .raw(Method::GET, "/api/v1/admin/participants/export", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let disposition = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(disposition.starts_with("attachment; filename=\"participants_event_"));
    assert!(disposition.ends_with(".csv\""));

    let Ok(csv) = String::from_utf8(bytes) else {
        panic!("export is not UTF-8");
    };
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("\"Name\",\"TaxId\",\"Email\""));
    assert!(csv.contains("\"São Paulo, Centro\""));
    assert!(csv.contains("\"paid\",\"pending\""));
}

#[tokio::test]
async fn deletion_needs_confirmation_and_is_permanent() {
    let app = app().await;
    let id = app.register("paid", "Ana", "Campinas").await;
    let token = app.login().await;
    let uri = format!("/api/v1/admin/participants/{id}");

    let (status, body) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!(2005));

    let (status, body) = app
        .call(Method::POST, &format!("{uri}/deletion"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], json!("Ana"));
    assert_eq!(body["tier"], json!("paid"));

    // Another session cannot use this session's confirmation.
    let other = app.login().await;
    let (status, _) = app.call(Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.call(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app
        .call(Method::GET, "/api/v1/admin/participants/stats", Some(&token), None)
        .await;
    assert_eq!(body["total"], json!(0));
}

#[tokio::test]
async fn toggles_feed_stats() {
    let app = app().await;
    let free = app.register("free", "Ana", "Campinas").await;
    let paid = app.register("paid", "Bia", "Campinas").await;
    app.register("paid", "Caio", "Campinas").await;
    let token = app.login().await;

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/admin/participants/{paid}/payment/toggle"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_status"], json!("approved"));

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/admin/participants/{free}/payment/toggle"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/admin/participants/{free}/attendance/toggle"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attendance_confirmed"], json!(true));

    let (_, body) = app
        .call(Method::GET, "/api/v1/admin/participants/stats", Some(&token), None)
        .await;
    assert_eq!(
        body,
        json!({"total": 3, "free": 1, "paid": 2, "pending_payments": 1, "attendance_confirmed": 1})
    );
}

#[tokio::test]
async fn profile_edit_changes_only_submitted_fields() {
    let app = app().await;
    let id = app.register("free", "Ana", "Campinas").await;
    let token = app.login().await;
    let uri = format!("/api/v1/admin/participants/{id}");

    let (status, body) = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"city": "Santos", "phone": "(13) 3222-1111"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], json!("Santos"));
    assert_eq!(body["phone"], json!("1332221111"));
    assert_eq!(body["full_name"], json!("Ana"));

    let (status, _) = app
        .call(Method::PATCH, &uri, Some(&token), Some(json!({"email": "nope"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::PATCH,
            "/api/v1/admin/participants/0b6f1a56-3d0f-4bb8-9d4e-6f3c1f9b2a11",
            Some(&token),
            Some(json!({"city": "Santos"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_edit_clears_optional_fields() {
    let app = app().await;
    let id = app.register("paid", "Ana", "Campinas").await;
    let token = app.login().await;
    let uri = format!("/api/v1/admin/participants/{id}");

    let (status, body) = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"company_name": "Acme", "sector": "retail"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company_name"], json!("Acme"));

    let (status, body) = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"company_name": "", "sector": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["company_name"].is_null());
    assert!(body["sector"].is_null());
    assert_eq!(body["city"], json!("Campinas"));

    let (_, body) = app.call(Method::GET, &uri, Some(&token), None).await;
    assert!(body["company_name"].is_null());
}

#[tokio::test]
async fn abandoned_send_request_still_notifies_everyone() {
    let app = app_with_delay(ScriptedNotifier::default(), Duration::from_millis(100)).await;
    let mut ids = Vec::new();
    for name in ["Ana", "Bia", "Caio", "Davi"] {
        ids.push(app.register("free", name, "Campinas").await);
    }
    let token = app.login().await;
    for id in &ids {
        app.call(
            Method::POST,
            &format!("/api/v1/admin/participants/{id}/attendance/toggle"),
            Some(&token),
            None,
        )
        .await;
    }

    let request = app.call(
        Method::POST,
        "/api/v1/admin/notifications/send",
        Some(&token),
        Some(json!({"participant_ids": ids})),
    );
    assert!(tokio::time::timeout(Duration::from_millis(60), request).await.is_err());

    let mut delivered = 0;
    for _ in 0..100 {
        delivered = app.notifier.sent.lock().map(|s| s.len()).unwrap_or_default();
        if delivered == 4 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(delivered, 4);
}

#[tokio::test]
async fn notifications_go_to_selected_attendees() {
    let app = app_with(ScriptedNotifier {
        reject: vec!["bia@mail.com".to_string()],
        ..ScriptedNotifier::default()
    })
    .await;
    let ana = app.register("free", "Ana", "Campinas").await;
    let bia = app.register("paid", "Bia", "Campinas").await;
    let caio = app.register("free", "Caio", "Campinas").await;
    let token = app.login().await;
    for id in [&ana, &bia] {
        app.call(
            Method::POST,
            &format!("/api/v1/admin/participants/{id}/attendance/toggle"),
            Some(&token),
            None,
        )
        .await;
    }

    let (_, body) = app
        .call(Method::GET, "/api/v1/admin/notifications/recipients", Some(&token), None)
        .await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/admin/notifications/send",
            Some(&token),
            Some(json!({"participant_ids": [caio]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/admin/notifications/send",
            Some(&token),
            Some(json!({"participant_ids": [ana, bia]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], json!(1));
    assert_eq!(body["failed_count"], json!(1));
    assert_eq!(
        body["errors"][0],
        json!("failed to send to Bia (bia@mail.com): message rejected: mailbox full")
    );

    let Ok(sent) = app.notifier.sent.lock() else {
        panic!("poisoned");
    };
    assert_eq!(*sent, ["ana@mail.com", "bia@mail.com"]);
}
