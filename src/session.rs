use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::clock;

/// Tab-scoped key/value storage. The browser's `sessionStorage` in the app,
/// an in-memory map in tests.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn clear(&self, key: &str);
}

impl<S: SessionStorage + ?Sized> SessionStorage for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn clear(&self, key: &str) {
        (**self).clear(key)
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn clear(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// `window.sessionStorage`, falling back to memory when the browser denies
/// access (private mode, sandboxed iframes).
pub struct BrowserSessionStorage {
    storage: Option<web_sys::Storage>,
    fallback: MemoryStorage,
}

impl BrowserSessionStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        if storage.is_none() {
            warn!("sessionStorage unavailable, session id will live in memory");
        }
        Self {
            storage,
            fallback: MemoryStorage::default(),
        }
    }
}

impl Default for BrowserSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for BrowserSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(key).ok().flatten())
            .or_else(|| self.fallback.get(key))
    }

    fn set(&self, key: &str, value: &str) {
        let stored = self
            .storage
            .as_ref()
            .map(|s| s.set_item(key, value).is_ok())
            .unwrap_or(false);
        if !stored {
            self.fallback.set(key, value);
        }
    }

    fn clear(&self, key: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.remove_item(key) {
                warn!(?err, key, "failed to remove from sessionStorage");
            }
        }
        self.fallback.clear(key);
    }
}

/// Hands out the conversation's correlation id, creating it on first use.
pub struct SessionIdProvider<S> {
    storage: S,
    key: String,
}

impl<S: SessionStorage> SessionIdProvider<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn get_or_create(&self) -> String {
        if let Some(existing) = self.storage.get(&self.key).filter(|id| !id.is_empty()) {
            return existing;
        }
        let id = generate_session_id();
        self.storage.set(&self.key, &id);
        debug!(key = %self.key, "created session id");
        id
    }

    /// Forget the id; the next `get_or_create` starts a new conversation.
    /// Returns `false` when the storage still holds an id afterwards.
    pub fn clear(&self) -> bool {
        self.storage.clear(&self.key);
        if self.storage.get(&self.key).is_some() {
            warn!(key = %self.key, "session id survived clear");
            return false;
        }
        debug!(key = %self.key, "cleared session id");
        true
    }
}

/// UUID v4 from the platform CSPRNG. Falls back to a pseudo-random base-36
/// string plus a base-36 timestamp, so generation never fails.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 16];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes).into_uuid().to_string(),
        Err(err) => {
            warn!(%err, "secure random source unavailable, using fallback session id");
            fallback_session_id(pseudo_random(), clock::now_ms())
        }
    }
}

fn fallback_session_id(random: f64, now_ms: i64) -> String {
    let scaled = (random.clamp(0.0, 1.0) * 36f64.powi(11)) as u64;
    format!("{}{}", to_base36(scaled), to_base36(now_ms.max(0) as u64))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn pseudo_random() -> f64 {
    js_sys::Math::random()
}

#[cfg(not(target_arch = "wasm32"))]
fn pseudo_random() -> f64 {
    let nanos = chrono::Utc::now().timestamp_subsec_nanos();
    f64::from(nanos) / 1_000_000_000.0
}
