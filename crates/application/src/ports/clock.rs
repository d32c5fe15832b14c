//! Wall-clock port

use chrono::{DateTime, Utc};

/// Port for reading wall-clock time.
///
/// Session timestamps and the refresh schedule read the time through this
/// trait so tests can pin it.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
