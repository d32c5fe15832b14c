//! Session controller and authorized client against a mock server.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use alumni_application::PERSIST_KEY;
use alumni_domain::{
    Credentials, LOGIN_SUCCESS_MESSAGE, Navigation, Notification, SessionEvent, SessionState,
};
use alumni_infrastructure::AuthorizedClient;
use common::{Wired, mint};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer, access: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refresh=r-1; Path=/; HttpOnly")
                .set_body_json(serde_json::json!({ "access_token": access })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn alice_signs_in_and_out() {
    let server = MockServer::start().await;
    let access = mint("alice", &["alumni"]);
    mount_login(&server, &access).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout/"))
        .and(header("authorization", format!("Bearer {access}").as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut wired = Wired::new(&server, true).await;

    let outcome = wired
        .controller
        .login(&Credentials::new("alice", "correct").unwrap(), "/dashboard")
        .await;
    assert!(outcome.is_authenticated());
    let session = wired.controller.store().session().unwrap();
    assert_eq!(session.identity.user(), "alice");
    assert_eq!(session.identity.roles(), ["alumni".to_string()]);
    assert_eq!(
        wired.drain_events(),
        vec![
            SessionEvent::Navigate(Navigation::replace("/dashboard")),
            SessionEvent::Notify(Notification::success(LOGIN_SUCCESS_MESSAGE)),
        ]
    );

    wired.controller.logout().await;

    assert_eq!(wired.controller.state(), SessionState::Anonymous);
    assert_eq!(wired.storage.get_item(PERSIST_KEY).await.unwrap(), None);
    assert_eq!(
        wired.drain_events(),
        vec![SessionEvent::Navigate(Navigation::reload("/signin"))]
    );
}

#[tokio::test]
async fn authorized_request_carries_bearer() {
    let server = MockServer::start().await;
    let access = mint("alice", &["alumni"]);
    mount_login(&server, &access).await;
    Mock::given(method("GET"))
        .and(path("/alumni/me/"))
        .and(header("authorization", format!("Bearer {access}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let wired = Wired::new(&server, false).await;
    wired
        .controller
        .login(&Credentials::new("alice", "correct").unwrap(), "/dashboard")
        .await;

    let client = AuthorizedClient::new(&wired.transport, wired.controller.clone());
    let response = client.get("/alumni/me/").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_credential_is_refreshed_once_and_replayed() {
    let server = MockServer::start().await;
    let stale = mint("alice", &["alumni"]);
    let renewed = mint("alice", &["alumni", "mentor"]);
    mount_login(&server, &stale).await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .and(header("cookie", "refresh=r-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "access_token": renewed })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/events/"))
        .and(header("authorization", format!("Bearer {stale}").as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/events/"))
        .and(header("authorization", format!("Bearer {renewed}").as_str()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let wired = Wired::new(&server, true).await;
    wired
        .controller
        .login(&Credentials::new("alice", "correct").unwrap(), "/dashboard")
        .await;

    let client = AuthorizedClient::new(&wired.transport, wired.controller.clone());
    let response = client
        .post_json("/events/", &serde_json::json!({ "title": "Reunion" }))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let session = wired.controller.store().session().unwrap();
    assert!(session.identity.has_role("mentor"));
}

#[tokio::test]
async fn denied_request_is_returned_when_refresh_is_not_allowed() {
    let server = MockServer::start().await;
    mount_login(&server, &mint("alice", &["alumni"])).await;
    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let wired = Wired::new(&server, false).await;
    wired
        .controller
        .login(&Credentials::new("alice", "correct").unwrap(), "/dashboard")
        .await;

    let client = AuthorizedClient::new(&wired.transport, wired.controller.clone());
    let response = client.get("/admin/").await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
