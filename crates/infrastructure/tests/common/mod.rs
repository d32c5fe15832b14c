//! Helpers shared by the adapter tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use alumni_application::{
    KeyValueStorage, PERSIST_KEY, PersistedPreference, SessionController, SessionStore,
};
use alumni_domain::{ApiEndpoints, SessionEvent};
use alumni_infrastructure::{
    ChannelEventSink, MemoryKeyValueStorage, ReqwestAuthTransport, SystemClock,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::MockServer;

/// Mints an access token signed with a key the client never sees.
pub fn mint(user: &str, roles: &[&str]) -> String {
    encode(
        &Header::default(),
        &serde_json::json!({ "user": user, "role": roles }),
        &EncodingKey::from_secret(b"server-only"),
    )
    .unwrap()
}

pub fn endpoints(server: &MockServer) -> ApiEndpoints {
    ApiEndpoints::with_base(&server.uri()).unwrap()
}

/// Controller over a real reqwest transport pointed at a mock server.
pub struct Wired {
    pub controller: Arc<SessionController>,
    pub transport: ReqwestAuthTransport,
    pub storage: Arc<dyn KeyValueStorage>,
    pub events: UnboundedReceiver<SessionEvent>,
}

impl Wired {
    pub async fn new(server: &MockServer, persist: bool) -> Self {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryKeyValueStorage::new());
        if persist {
            storage.set_item(PERSIST_KEY, "true").await.unwrap();
        }
        let transport = ReqwestAuthTransport::new(endpoints(server)).unwrap();
        let preference = PersistedPreference::new(Arc::clone(&storage), PERSIST_KEY);
        let store = Arc::new(SessionStore::open(preference).await);
        let (sink, events) = ChannelEventSink::new();
        let sink = Arc::new(sink);
        let controller = SessionController::new(
            store,
            Arc::new(transport.clone()),
            sink.clone(),
            sink,
            Arc::new(SystemClock::new()),
        );

        Self {
            controller: Arc::new(controller),
            transport,
            storage,
            events,
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
