//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod events;
mod storage;
mod transport;

pub use clock::Clock;
pub use events::{Navigator, Notifier};
pub use storage::KeyValueStorage;
pub use transport::{AuthTransport, TokenResponse};
