//! Session
//!
//! Holds the bearer token handed out at login. The token lives in a
//! `TokenStore` (browser localStorage in production) and is read on every
//! request, so a reload keeps the user logged in.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

/// Persistent home of the session token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn remove(&self);
}

/// `window.localStorage` under a fixed key
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl TokenStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(&self.key).ok().flatten())
    }

    fn save(&self, token: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(&self.key, token).is_err() {
                    warn!("[SESSION] localStorage rejected the token");
                }
            }
            None => warn!("[SESSION] localStorage unavailable, token not persisted"),
        }
    }

    fn remove(&self) {
        match Self::storage() {
            Some(storage) => {
                if storage.remove_item(&self.key).is_err() {
                    warn!("[SESSION] localStorage refused to clear the token");
                }
            }
            None => warn!("[SESSION] localStorage unavailable, token not cleared"),
        }
    }
}

/// In-process store, used where no browser storage exists
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn save(&self, token: &str) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
    }

    fn remove(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

/// Cloneable handle to the session token
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// localStorage-backed session; falls back to memory when the browser
    /// denies storage (private mode, sandboxed frames)
    pub fn local_storage(key: impl Into<String>) -> Self {
        if LocalStorageStore::storage().is_none() {
            warn!("[SESSION] localStorage unavailable, token kept in memory for this tab");
            return Self::in_memory();
        }
        Self::new(Arc::new(LocalStorageStore::new(key)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    /// Current token; empty strings count as no token
    pub fn get(&self) -> Option<String> {
        self.store.load().filter(|t| !t.is_empty())
    }

    pub fn set(&self, token: &str) {
        info!("[SESSION] Token stored");
        self.store.save(token);
    }

    pub fn clear(&self) {
        debug!("[SESSION] Token cleared");
        self.store.remove();
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
