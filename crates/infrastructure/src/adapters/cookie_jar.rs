//! Cookie jar that outlives the process.
//!
//! The refresh credential is an HTTP-only cookie. A browser keeps it across
//! restarts; a command-line client has to save it itself. Only the `Cookie`
//! header each authentication endpoint would receive is stored, under
//! [`COOKIE_KEY`], so cookie attributes are not preserved: restored cookies
//! are host-only with path `/`.

use std::collections::BTreeMap;
use std::sync::Arc;

use alumni_application::KeyValueStorage;
use alumni_domain::ApiEndpoints;
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Storage key of the saved cookies.
pub const COOKIE_KEY: &str = "cookies";

/// A reqwest cookie jar mirrored into key/value storage.
#[derive(Clone)]
pub struct PersistentCookieJar {
    jar: Arc<Jar>,
    storage: Arc<dyn KeyValueStorage>,
    endpoints: ApiEndpoints,
}

impl std::fmt::Debug for PersistentCookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentCookieJar")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl PersistentCookieJar {
    /// Creates an empty jar for the given endpoints.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, endpoints: ApiEndpoints) -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            storage,
            endpoints,
        }
    }

    /// The jar to hand to the HTTP client.
    #[must_use]
    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    fn urls(&self) -> [&Url; 3] {
        [
            self.endpoints.login(),
            self.endpoints.refresh(),
            self.endpoints.logout(),
        ]
    }

    /// Loads saved cookies into the jar. Returns how many were restored.
    pub async fn restore(&self) -> usize {
        let raw = match self.storage.get_item(COOKIE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(e) => {
                tracing::error!(error = %e, "failed to read saved cookies");
                return 0;
            }
        };

        let saved: BTreeMap<String, String> = match serde_json::from_str(&raw) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!(error = %e, "ignoring unreadable saved cookies");
                return 0;
            }
        };

        let mut restored = 0;
        for (url, header) in saved {
            let Ok(url) = Url::parse(&url) else {
                continue;
            };
            // Root path, so a cookie the server sets again replaces this one.
            for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                self.jar.add_cookie_str(&format!("{pair}; Path=/"), &url);
                restored += 1;
            }
        }
        tracing::debug!(restored, "restored saved cookies");
        restored
    }

    /// Saves the cookies currently sent to the authentication endpoints.
    pub async fn save(&self) {
        let saved: BTreeMap<String, String> = self
            .urls()
            .into_iter()
            .filter_map(|url| {
                let header = self.jar.cookies(url)?;
                let header = header.to_str().ok()?.to_string();
                Some((url.to_string(), header))
            })
            .collect();

        if saved.is_empty() {
            self.forget().await;
            return;
        }

        match serde_json::to_string(&saved) {
            Ok(raw) => {
                if let Err(e) = self.storage.set_item(COOKIE_KEY, &raw).await {
                    tracing::error!(error = %e, "failed to save cookies");
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to encode cookies"),
        }
    }

    /// Removes saved cookies. The in-memory jar is left alone.
    pub async fn forget(&self) {
        if let Err(e) = self.storage.remove_item(COOKIE_KEY).await {
            tracing::error!(error = %e, "failed to remove saved cookies");
        }
    }
}
