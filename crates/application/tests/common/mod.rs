//! Shared test doubles for the session core.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alumni_application::{
    AuthTransport, Clock, KeyValueStorage, Navigator, Notifier, PERSIST_KEY, PersistedPreference,
    SessionController, SessionStore, StorageError, TokenResponse, TransportError,
};
use alumni_domain::{Credentials, Navigation, Notification};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::sync::Notify;

static NONCE: AtomicU64 = AtomicU64::new(0);

/// Mints a signed access token the way the server would.
pub fn mint(user: &str, roles: &[&str], exp: Option<i64>) -> String {
    let mut claims = serde_json::json!({
        "user": user,
        "role": roles,
        "jti": NONCE.fetch_add(1, Ordering::SeqCst),
    });
    if let Some(exp) = exp {
        claims["exp"] = serde_json::json!(exp);
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"issuer-secret"),
    )
    .unwrap()
}

pub fn token(access_token: impl Into<String>) -> Result<TokenResponse, TransportError> {
    Ok(TokenResponse {
        access_token: access_token.into(),
    })
}

pub fn rejected(status: u16, details: Option<&str>) -> Result<TokenResponse, TransportError> {
    Err(TransportError::Status {
        status,
        details: details.map(String::from),
    })
}

/// Transport that answers from scripted queues.
#[derive(Default)]
pub struct ScriptedTransport {
    login: Mutex<VecDeque<Result<TokenResponse, TransportError>>>,
    refresh: Mutex<VecDeque<Result<TokenResponse, TransportError>>>,
    logout_fails: Mutex<bool>,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub logout_tokens: Mutex<Vec<Option<String>>>,
    /// When set, `refresh` waits for a permit before answering.
    pub refresh_hold: Mutex<Option<Arc<Notify>>>,
    /// Signalled when a `refresh` call reaches the transport.
    pub refresh_entered: Arc<Notify>,
}

impl ScriptedTransport {
    pub fn push_login(&self, response: Result<TokenResponse, TransportError>) {
        self.login.lock().unwrap().push_back(response);
    }

    pub fn push_refresh(&self, response: Result<TokenResponse, TransportError>) {
        self.refresh.lock().unwrap().push_back(response);
    }

    pub fn fail_logout(&self) {
        *self.logout_fails.lock().unwrap() = true;
    }

    pub fn hold_refresh(&self) -> Arc<Notify> {
        let hold = Arc::new(Notify::new());
        *self.refresh_hold.lock().unwrap() = Some(hold.clone());
        hold
    }

    fn unscripted() -> Result<TokenResponse, TransportError> {
        Err(TransportError::Connection("no scripted response".to_string()))
    }
}

#[async_trait]
impl AuthTransport for ScriptedTransport {
    async fn login(&self, _credentials: &Credentials) -> Result<TokenResponse, TransportError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.login.lock().unwrap().pop_front();
        next.unwrap_or_else(Self::unscripted)
    }

    async fn refresh(&self) -> Result<TokenResponse, TransportError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_entered.notify_one();

        let hold = self.refresh_hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }

        let next = self.refresh.lock().unwrap().pop_front();
        next.unwrap_or_else(Self::unscripted)
    }

    async fn logout(&self, access_token: Option<&str>) -> Result<(), TransportError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout_tokens
            .lock()
            .unwrap()
            .push(access_token.map(String::from));
        if *self.logout_fails.lock().unwrap() {
            return Err(TransportError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

/// In-memory key/value storage.
#[derive(Default)]
pub struct MapStorage(pub Mutex<HashMap<String, String>>);

#[async_trait]
impl KeyValueStorage for MapStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.0.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Records every notification and navigation.
#[derive(Default)]
pub struct Recorder {
    pub notifications: Mutex<Vec<Notification>>,
    pub navigations: Mutex<Vec<Navigation>>,
}

impl Recorder {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

impl Navigator for Recorder {
    fn navigate(&self, navigation: Navigation) {
        self.navigations.lock().unwrap().push(navigation);
    }
}

/// Clock pinned at construction time.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct Harness {
    pub controller: Arc<SessionController>,
    pub transport: Arc<ScriptedTransport>,
    pub storage: Arc<MapStorage>,
    pub events: Arc<Recorder>,
    pub now: DateTime<Utc>,
}

impl Harness {
    pub async fn new(persist: bool) -> Self {
        let storage = Arc::new(MapStorage::default());
        if persist {
            storage.set_item(PERSIST_KEY, "true").await.unwrap();
        }

        let transport = Arc::new(ScriptedTransport::default());
        let events = Arc::new(Recorder::default());
        let now = Utc::now();

        let preference = PersistedPreference::new(storage.clone(), PERSIST_KEY);
        let store = SessionStore::open(preference).await;
        let controller = SessionController::new(
            Arc::new(store),
            transport.clone(),
            events.clone(),
            events.clone(),
            Arc::new(FixedClock(now)),
        );

        Self {
            controller: Arc::new(controller),
            transport,
            storage,
            events,
            now,
        }
    }

    pub fn stored_persist(&self) -> Option<String> {
        self.storage.0.lock().unwrap().get(PERSIST_KEY).cloned()
    }

    /// Logs in as `user` with the given token and clears recorded events.
    pub async fn login_as(&self, access_token: &str) {
        self.transport.push_login(token(access_token));
        let creds = Credentials::new("alice", "correct").unwrap();
        assert!(self.controller.login(&creds, "/dashboard").await.is_authenticated());
        self.events.notifications.lock().unwrap().clear();
        self.events.navigations.lock().unwrap().clear();
    }
}
