//! Infrastructure adapters

mod cookie_jar;
mod events;
mod reqwest_transport;
mod system_clock;

pub use cookie_jar::{COOKIE_KEY, PersistentCookieJar};
pub use events::{ChannelEventSink, TracingEventSink};
pub use reqwest_transport::{REQUEST_ID_HEADER, REQUEST_TIMEOUT, ReqwestAuthTransport};
pub(crate) use reqwest_transport::map_error;
pub use system_clock::SystemClock;
