use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use secrecy::SecretString;
use url::Url;

/// Per-client session state: the endpoint, the outbound request counter
/// and the auth token. Shared behind an `Arc` by client clones, so the
/// counter is atomic and the token sits behind a lock.
pub(crate) struct Session {
    base: Url,
    next_id: AtomicU64,
    token: Mutex<Option<SecretString>>,
}

impl Session {
    pub(crate) fn new(base: Url, token: Option<SecretString>) -> Self {
        Self {
            base,
            next_id: AtomicU64::new(0),
            token: Mutex::new(token),
        }
    }

    pub(crate) fn base(&self) -> &Url {
        &self.base
    }

    /// Issue the next request id. Ids start at 1, strictly increase and
    /// are never reused, even when the call they were issued for fails.
    pub(crate) fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Snapshot of the current token, cloned out under the lock so a call
    /// never observes a token being replaced mid-encode.
    pub(crate) fn token(&self) -> Option<SecretString> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_token(&self, token: SecretString) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear_token(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn has_token(&self) -> bool {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
