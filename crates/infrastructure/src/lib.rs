//! Alumni Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading and the
//! wiring that assembles them.

pub mod adapters;
pub mod config;
pub mod http;
pub mod persistence;
pub mod runtime;
pub mod serialization;

pub use adapters::{
    COOKIE_KEY, ChannelEventSink, PersistentCookieJar, REQUEST_ID_HEADER, REQUEST_TIMEOUT,
    ReqwestAuthTransport, SystemClock, TracingEventSink,
};
pub use config::{CONFIG_FILE_NAME, ClientConfig, ConfigError, ENV_PREFIX};
pub use http::{AuthorizedClient, AuthorizedRequestError};
pub use persistence::{APP_DIR_NAME, FileKeyValueStorage, MemoryKeyValueStorage, STORAGE_FILE_NAME};
pub use runtime::{SessionRuntime, StartupError};
pub use serialization::{
    SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
