//! Common test utilities for integration tests.
//!
//! Builds the full client stack (reqwest transport, file store, manual
//! clock) against a wiremock server.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let client = TestClient::new(&server.uri());
//! let result = client.repos.schedule.get_all_schedules().await;
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use classbook::adapters::{FileStore, ManualClock, ReqwestHttpClient};
use classbook::config::ClientConfig;
use classbook::repository::Repositories;
use classbook::session::{Role, Session, SessionStore};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Token the mock server hands out and expects.
pub const TOKEN: &str = "T1";

/// A client stack wired to one server and one temporary data directory.
pub struct TestClient {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub clock: ManualClock,
    pub repos: Repositories,
    /// Keeps the data directory alive for the test's duration
    pub data_dir: Arc<TempDir>,
}

impl TestClient {
    pub fn new(base_url: &str) -> Self {
        let data_dir = Arc::new(TempDir::new().expect("Failed to create temp dir"));
        Self::with_data_dir(base_url, data_dir)
    }

    /// A second client sharing `data_dir`, as after a restart.
    pub fn with_data_dir(base_url: &str, data_dir: Arc<TempDir>) -> Self {
        let config = ClientConfig::default()
            .with_base_url(base_url)
            .with_data_dir(data_dir.path())
            .with_request_timeout(std::time::Duration::from_secs(5));
        let store = FileStore::open(&config.data_dir).expect("Failed to open store");
        let http = ReqwestHttpClient::with_timeout(config.request_timeout)
            .expect("Failed to build HTTP client");
        let clock = ManualClock::default();
        let session = Arc::new(SessionStore::new());
        let repos = Repositories::new(
            &config,
            Arc::new(http),
            Arc::new(store),
            Arc::new(clock.clone()),
            Arc::clone(&session),
        );
        Self {
            config,
            session,
            clock,
            repos,
            data_dir,
        }
    }

    /// Start with a signed-in session without calling the server.
    pub fn signed_in(self, role: Role) -> Self {
        self.session.set(Session {
            auth_token: Some(TOKEN.to_string()),
            user_id: Some("U1".to_string()),
            role: Some(role),
            user_name: Some("Mikhail".to_string()),
            user_surname: Some("Znakin".to_string()),
            login: Some("m.znakin@mail.ru".to_string()),
        });
        self
    }
}

/// Body of a successful admin login.
pub fn login_response() -> Value {
    json!({
        "token": TOKEN,
        "userId": "U1",
        "role": "admin",
        "name": "Mikhail",
        "surname": "Znakin"
    })
}

/// Profile returned by `GET /user/info` for the admin.
pub fn admin_profile() -> Value {
    json!({
        "userId": "U1",
        "email": "m.znakin@mail.ru",
        "name": "Mikhail",
        "surname": "Znakin",
        "class": "",
        "school": "School 57",
        "role": "admin"
    })
}

/// Monday schedules for two classes.
pub fn monday_schedules() -> Value {
    json!([
        {
            "scheduleId": "S1", "className": "7B", "day": "monday",
            "lessons": ["Math", "Physics", "", "History"],
            "office": ["101", "204", "", "310"]
        },
        {
            "scheduleId": "S2", "className": "10A", "day": "monday",
            "lessons": ["Chemistry"],
            "office": ["301"]
        }
    ])
}

pub fn grade(id: &str, subject: &str, value: i32) -> Value {
    json!({
        "gradeId": id,
        "studentId": "U1",
        "teacherId": "T7",
        "teacherName": "Anna Petrova",
        "subjectName": subject,
        "className": "10A",
        "gradeValue": value,
        "gradeType": "test",
        "lessonDate": "2024-09-12"
    })
}
