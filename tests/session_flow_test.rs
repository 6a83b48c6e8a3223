//! Login, restart, restore, and logout against a wiremock server.

mod common;

use std::sync::Arc;

use classbook::repository::{TOKEN_KEY, USER_LOGIN_KEY};
use classbook::session::Role;
use common::{admin_profile, login_response, TestClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response()))
        .mount(server)
        .await;
}

fn stored(client: &TestClient) -> serde_json::Value {
    let raw = std::fs::read_to_string(client.data_dir.path().join("store.json"))
        .expect("store file should exist");
    serde_json::from_str(&raw).expect("store file should be JSON")
}

#[tokio::test]
async fn test_login_persists_token_and_login() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let client = TestClient::new(&server.uri());

    let session = client
        .repos
        .auth
        .login("m.znakin@mail.ru", "validpass")
        .await
        .into_result()
        .expect("login should succeed");

    assert_eq!(session.auth_token.as_deref(), Some("T1"));
    assert_eq!(session.user_id.as_deref(), Some("U1"));
    assert_eq!(session.role, Some(Role::Admin));
    assert_eq!(client.session.token().as_deref(), Some("T1"));

    let file = stored(&client);
    assert_eq!(file[TOKEN_KEY], "T1");
    assert_eq!(file[USER_LOGIN_KEY], "m.znakin@mail.ru");
}

#[tokio::test]
async fn test_session_survives_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/user/info"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_profile()))
        .expect(1)
        .mount(&server)
        .await;

    let first = TestClient::new(&server.uri());
    first.repos.auth.login("m.znakin@mail.ru", "validpass").await;

    let second = TestClient::with_data_dir(&server.uri(), Arc::clone(&first.data_dir));
    assert!(!second.session.is_authenticated());

    let restored = second
        .repos
        .auth
        .restore_session()
        .await
        .into_result()
        .expect("restore should succeed")
        .expect("a session should be restored");

    assert_eq!(restored.display_name().as_deref(), Some("Mikhail Znakin"));
    assert!(second.session.is_authenticated());
}

#[tokio::test]
async fn test_rejected_token_is_forgotten() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/user/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let first = TestClient::new(&server.uri());
    first.repos.auth.login("m.znakin@mail.ru", "validpass").await;

    let second = TestClient::with_data_dir(&server.uri(), Arc::clone(&first.data_dir));
    let restored = second.repos.auth.restore_session().await;

    assert_eq!(restored.data(), Some(&None));
    assert!(!second.session.is_authenticated());
    assert!(stored(&second).get(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_logout_removes_persisted_credentials() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let client = TestClient::new(&server.uri());
    client.repos.auth.login("m.znakin@mail.ru", "validpass").await;

    assert!(client.repos.auth.logout().await.is_success());

    assert!(!client.session.is_authenticated());
    let file = stored(&client);
    assert!(file.get(TOKEN_KEY).is_none());
    assert!(file.get(USER_LOGIN_KEY).is_none());
}
