//! Mock API tests for the userdesk HTTP client.
//!
//! These tests use wiremock to simulate the user-management backend and check
//! the transport's credential handling without a real server.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use userdesk_core::{
    ApiUrl, Credentials, ErrorKind, MemoryStorage, Role, Route, SessionStore, StoredSession,
    UserId, UserUpdate,
};
use userdesk_http::{ApiClient, ClientConfig, flows};

/// Build an unsigned token for `sub` with `role`.
fn token(sub: i64, role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({"sub": sub, "role": role, "exp": 1_900_000_000, "iat": 1_700_000_000});
    let body = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.sig-{}", header, body, role)
}

/// A second, distinct token for the same subject.
fn fresh_token(sub: i64, role: &str) -> String {
    format!("{}-fresh", token(sub, role))
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn api_for(server: &MockServer, session: SessionStore) -> ApiClient {
    // Plain HTTP is accepted for loopback addresses
    let url = ApiUrl::new(&format!("http://127.0.0.1:{}", server.address().port())).unwrap();
    ApiClient::new(&ClientConfig::new(url), session).unwrap()
}

fn signed_in(sub: i64, role: &str) -> SessionStore {
    let session = SessionStore::in_memory();
    session.set_credential(Some(&token(sub, role))).unwrap();
    session
}

fn user_json(id: i64, username: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Alice Example",
        "username": username,
        "email": format!("{}@example.com", username),
        "city": "Lisbon",
        "role": "user"
    })
}

// ============================================================================
// Sign-in Tests
// ============================================================================

#[tokio::test]
async fn test_sign_in_then_fetch_profile_with_bearer() {
    let server = MockServer::start().await;
    let jwt = token(7, "user");

    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .and(body_json(json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": jwt})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users/7"))
        .and(header("authorization", bearer(&jwt).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7, "alice")))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    let api = api_for(&server, session.clone());

    let next = flows::sign_in(&api, &Credentials::new("alice", "pw"))
        .await
        .unwrap();
    assert_eq!(next, Route::Home);
    assert_eq!(session.subject_id(), Some(UserId::new(7)));
    assert!(!session.is_admin());

    let me = api.get_self().await.unwrap();
    assert_eq!(me.username, "alice");
    assert_eq!(me.city.as_deref(), Some("Lisbon"));
}

#[tokio::test]
async fn test_sign_in_rejected_keeps_session_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid credentials"})),
        )
        .mount(&server)
        .await;

    // Every 401 gets one refresh attempt, anonymous or not
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    let api = api_for(&server, session.clone());

    let err = flows::sign_in(&api, &Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SessionExpired);
    assert_eq!(err.user_message("Failed to login"), "Failed to login");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_sign_in_with_malformed_token_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "garbage"})))
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    let api = api_for(&server, session.clone());

    let err = flows::sign_in(&api, &Credentials::new("alice", "pw"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedCredential);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_register_goes_to_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/sign-up"))
        .and(body_json(json!({
            "name": "Bob",
            "username": "bob",
            "email": "bob@example.com",
            "password": "pw",
            "city": "Oslo"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12})))
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    let api = api_for(&server, session.clone());

    let input = userdesk_core::SignUpInput {
        name: "Bob".into(),
        username: "bob".into(),
        email: "bob@example.com".into(),
        password: "pw".into(),
        city: "Oslo".into(),
    };
    let (id, next) = flows::register(&api, &input).await.unwrap();
    assert_eq!(id, UserId::new(12));
    assert_eq!(next, Route::Login);
    assert!(!session.is_authenticated());
}

// ============================================================================
// Refresh and Retry Tests
// ============================================================================

#[tokio::test]
async fn test_expired_credential_is_refreshed_and_retried_once() {
    let server = MockServer::start().await;
    let old = token(7, "user");
    let new = fresh_token(7, "user");

    Mock::given(method("GET"))
        .and(path("/api/users/7"))
        .and(header("authorization", bearer(&old).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": new})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users/7"))
        .and(header("authorization", bearer(&new).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7, "alice")))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in(7, "user");
    let api = api_for(&server, session.clone());

    let me = api.get_self().await.unwrap();
    assert_eq!(me.id, UserId::new(7));
    assert_eq!(
        session.current_credential().unwrap().as_str(),
        new.as_str()
    );
}

#[tokio::test]
async fn test_second_unauthorized_is_returned_without_another_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"accessToken": fresh_token(1, "admin")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in(1, "admin");
    let api = api_for(&server, session.clone());

    let err = api.list_users().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.server_message(), Some("nope"));
    // The refreshed credential is kept; only a failed refresh clears
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_forbidden_is_not_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "admins only"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = signed_in(7, "user");
    let api = api_for(&server, session.clone());

    let err = api.list_users().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(err.user_message("Failed to fetch users"), "admins only");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "refresh token expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let session = SessionStore::open(storage.clone()).unwrap();
    session.set_credential(Some(&token(7, "user"))).unwrap();
    let api = api_for(&server, session.clone());

    let err = api.get_self().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SessionExpired);
    assert_eq!(err.server_message(), Some("refresh token expired"));
    assert!(!session.is_authenticated());
    assert!(storage.snapshot().is_none());
}

#[tokio::test]
async fn test_concurrent_rejections_share_one_refresh() {
    let server = MockServer::start().await;
    let old = token(1, "admin");
    let new = fresh_token(1, "admin");

    Mock::given(method("GET"))
        .and(header("authorization", bearer(&old).as_str()))
        .and(path("/admin/users/2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", bearer(&old).as_str()))
        .and(path("/admin/users/3"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": new}))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", bearer(&new).as_str()))
        .and(path("/admin/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(2, "bob")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", bearer(&new).as_str()))
        .and(path("/admin/users/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(3, "carol")))
        .mount(&server)
        .await;

    let session = signed_in(1, "admin");
    let api = api_for(&server, session.clone());

    let (bob, carol) = futures_util::future::join(
        api.get_user(UserId::new(2)),
        api.get_user(UserId::new(3)),
    )
    .await;

    assert_eq!(bob.unwrap().username, "bob");
    assert_eq!(carol.unwrap().username, "carol");
}

#[tokio::test]
async fn test_concurrent_rejections_share_one_failed_refresh() {
    let server = MockServer::start().await;
    let old = token(1, "admin");

    Mock::given(method("GET"))
        .and(path_regex(r"^/admin/users/\d+$"))
        .and(header("authorization", bearer(&old).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "refresh token expired"}))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let session = SessionStore::open(storage.clone()).unwrap();
    session.set_credential(Some(&old)).unwrap();
    let api = api_for(&server, session.clone());

    let (bob, carol) = futures_util::future::join(
        api.get_user(UserId::new(2)),
        api.get_user(UserId::new(3)),
    )
    .await;

    // One request ran the refresh; the other found the session already gone
    let bob = bob.unwrap_err();
    let carol = carol.unwrap_err();
    assert_eq!(bob.kind(), ErrorKind::SessionExpired);
    assert_eq!(carol.kind(), ErrorKind::SessionExpired);
    assert!(
        [&bob, &carol]
            .iter()
            .any(|e| e.server_message() == Some("refresh token expired"))
    );
    assert!(!session.is_authenticated());
    assert!(storage.snapshot().is_none());
}

// ============================================================================
// Self-service Tests
// ============================================================================

#[tokio::test]
async fn test_self_service_without_session_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = api_for(&server, SessionStore::in_memory());

    let err = api.get_self().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    let err = api.delete_self().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_update_self_sends_only_changed_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/7"))
        .and(body_json(json!({"city": "Porto"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in(7, "user"));
    let update = UserUpdate {
        city: Some("Porto".into()),
        ..Default::default()
    };
    api.update_self(&update).await.unwrap();
}

#[tokio::test]
async fn test_delete_account_clears_session_after_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in(7, "user");
    let api = api_for(&server, session.clone());

    let next = flows::delete_account(&api).await.unwrap();
    assert_eq!(next, Route::Login);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_delete_account_failure_keeps_session() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": ""})))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in(7, "user");
    let api = api_for(&server, session.clone());

    let err = flows::delete_account(&api).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(
        err.user_message("Failed to delete account"),
        "Failed to delete account"
    );
    assert!(session.is_authenticated());
    assert_eq!(session.subject_id(), Some(UserId::new(7)));
}

// ============================================================================
// Administration Tests
// ============================================================================

#[tokio::test]
async fn test_list_users_accepts_capitalised_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ID": 1, "Name": "Root", "Username": "root", "Email": "root@example.com", "City": "", "Role": "admin"},
            {"id": 2, "name": "Bob", "username": "bob", "email": "bob@example.com", "role": "user"}
        ])))
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in(1, "admin"));
    let users = api.list_users().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].role, Role::Admin);
    assert_eq!(users[0].city, None);
    assert_eq!(users[1].username, "bob");
}

#[tokio::test]
async fn test_list_users_null_body_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in(1, "admin"));
    assert!(api.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_user_validation_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/users"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "username already taken"})),
        )
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in(1, "admin"));
    let input = userdesk_core::CreateUserInput {
        name: "Bob".into(),
        username: "bob".into(),
        email: "bob@example.com".into(),
        password: "pw".into(),
        city: String::new(),
        role: Role::User,
    };

    let err = api.create_user(&input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message("Failed to create user"), "username already taken");
}

#[tokio::test]
async fn test_admin_update_and_delete_paths() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/admin/users/5"))
        .and(body_json(json!({"role": "admin"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/users/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, signed_in(1, "admin"));
    let update = UserUpdate {
        role: Some(Role::Admin),
        ..Default::default()
    };
    api.update_user(UserId::new(5), &update).await.unwrap();
    api.delete_user(UserId::new(5)).await.unwrap();
}

// ============================================================================
// Server Session State Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_cookie_is_remembered_and_sent_back() {
    let server = MockServer::start().await;
    let jwt = token(7, "user");

    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=r1; Path=/; HttpOnly")
                .set_body_json(json!({"accessToken": jwt})),
        )
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let session = SessionStore::open(storage.clone()).unwrap();
    let api = api_for(&server, session.clone());
    flows::sign_in(&api, &Credentials::new("alice", "pw"))
        .await
        .unwrap();

    let state = session.server_state().unwrap();
    assert!(state.contains("refreshToken=r1"));
    assert_eq!(storage.snapshot().unwrap().server_state, Some(state));
}

#[tokio::test]
async fn test_saved_cookie_is_used_for_refresh() {
    let server = MockServer::start().await;
    let new = fresh_token(7, "user");

    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refreshToken=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": new})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = MemoryStorage::with_session(StoredSession {
        credential: Some(token(7, "user")),
        server_state: Some("refreshToken=r1".into()),
    });
    let session = SessionStore::open(storage).unwrap();
    let api = api_for(&server, session.clone());

    let credential = api.refresh().await.unwrap();
    assert_eq!(credential.as_str(), new.as_str());
    // `refresh` alone does not install the credential
    assert_ne!(session.current_credential(), Some(credential));
}

#[tokio::test]
async fn test_sign_out_forgets_refresh_cookie_on_live_client() {
    let server = MockServer::start().await;
    let jwt = token(7, "user");

    Mock::given(method("POST"))
        .and(path("/auth/sign-in"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=r1; Path=/; HttpOnly")
                .set_body_json(json!({"accessToken": jwt})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    let api = api_for(&server, session.clone());
    flows::sign_in(&api, &Credentials::new("alice", "pw"))
        .await
        .unwrap();
    assert!(session.server_state().is_some());

    assert_eq!(flows::sign_out(&session).unwrap(), Route::Login);
    api.list_users().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert_eq!(last.url.path(), "/admin/users");
    assert!(last.headers.get("cookie").is_none());
    assert!(last.headers.get("authorization").is_none());
    assert!(session.server_state().is_none());
}
