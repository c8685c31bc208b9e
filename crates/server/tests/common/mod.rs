//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the real router over a
//! temporary ticket store and upload directory, plus a small multipart
//! form builder for the submission endpoint.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use supportdesk_core::config::{AuthConfig, StorageConfig};
use supportdesk_core::{
    create_authenticator, AttachmentStore, AuthMethod, Authenticator, Config, CsvTicketStore,
    TicketRecord, TicketStore,
};
use supportdesk_server::{api::create_router, state::AppState};

/// Password used by fixtures with password auth.
pub const STAFF_PASSWORD: &str = "correct-horse";

/// Test fixture wrapping an in-process server.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_submit() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.submit(MultipartForm::valid()).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Direct handle on the ticket store behind the router
    pub store: Arc<CsvTicketStore>,
    /// Direct handle on the attachment store behind the router
    pub attachments: Arc<AttachmentStore>,
    /// Temporary directory holding the store and uploads
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    /// Parsed JSON body, or `Value::Null` when the body is not JSON
    pub body: Value,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub auth_method: AuthMethod,
    pub max_attachment_bytes: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            auth_method: AuthMethod::Password,
            max_attachment_bytes: 1024,
        }
    }
}

impl TestFixture {
    /// Fixture with password auth and a 1 KiB attachment limit.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let config = Config {
            auth: AuthConfig {
                method: test_config.auth_method,
                password: Some(STAFF_PASSWORD.to_string()),
            },
            storage: StorageConfig {
                data_dir: temp_dir.path().join("data"),
                upload_dir: temp_dir.path().join("uploads"),
                max_attachment_bytes: test_config.max_attachment_bytes,
                ..StorageConfig::default()
            },
            ..Config::default()
        };

        let authenticator: Arc<dyn Authenticator> = Arc::from(
            create_authenticator(&config.auth).expect("Failed to create authenticator"),
        );
        let store = Arc::new(
            CsvTicketStore::new(config.storage.submissions_path())
                .expect("Failed to create ticket store"),
        );
        let attachments = Arc::new(AttachmentStore::from_config(&config.storage));

        let state = Arc::new(AppState::new(
            config,
            authenticator,
            store.clone(),
            attachments.clone(),
        ));

        Self {
            router: create_router(state),
            store,
            attachments,
            temp_dir,
        }
    }

    /// Append a record directly to the store, bypassing the API.
    pub fn seed(&self, record: &TicketRecord) {
        self.store.append(record).expect("Failed to seed record");
    }

    /// Send an unauthenticated GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a GET request carrying the staff password.
    pub async fn staff_get(&self, path: &str) -> TestResponse {
        self.send(
            Request::builder()
                .uri(path)
                .header("X-Staff-Password", STAFF_PASSWORD)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Post a multipart form to the submission endpoint.
    pub async fn submit(&self, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.encode();
        self.send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/tickets")
                .header("Content-Type", content_type)
                .header("User-Agent", "fixture-agent/1.0")
                .header("X-Forwarded-For", "198.51.100.7")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Send a request to the test server.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

const BOUNDARY: &str = "supportdesk-test-boundary";

/// Builder for `multipart/form-data` request bodies.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    file: Option<(String, Vec<u8>)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form that passes validation.
    pub fn valid() -> Self {
        Self::new()
            .text("full_name", "Jane Doe")
            .text("email", "jane@example.com")
            .text("category", "Bug report")
            .text("priority", "High")
            .text("order_ref", "ORD-1001")
            .text("subject", "Checkout fails")
            .text("message", "The pay button does nothing.")
            .text("consent", "on")
    }

    /// Set a text field, replacing any previous value.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.fields.retain(|(existing, _)| existing != name);
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    /// Drop a field entirely.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.retain(|(existing, _)| existing != name);
        self
    }

    /// Attach a file under the `attachment` field.
    pub fn file(mut self, file_name: &str, bytes: &[u8]) -> Self {
        self.file = Some((file_name.to_string(), bytes.to_vec()));
        self
    }

    /// Content type header value and body bytes.
    pub fn encode(&self) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for (name, value) in &self.fields {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        if let Some((file_name, bytes)) = &self.file {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"attachment\"; filename=\"{}\"\r\n",
                    file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        (
            format!("multipart/form-data; boundary={}", BOUNDARY),
            body,
        )
    }
}

/// Build a stored record for seeding.
pub fn record(timestamp: &str, name: &str, category: &str, priority: &str) -> TicketRecord {
    TicketRecord {
        timestamp: supportdesk_core::ticket::parse_timestamp(timestamp),
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        category: category.to_string(),
        priority: priority.to_string(),
        order_ref: String::new(),
        subject: format!("Question from {}", name),
        message: "Hello support.".to_string(),
        attachment_file: String::new(),
        client_ip: "192.0.2.1".to_string(),
        user_agent: "seed".to_string(),
    }
}
