use crate::error::ApiError;
use crate::types::UserProfile;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const KEYRING_SERVICE: &str = "org.campus.client";

/// Storage keys, mirroring the browser storage contract.
pub const KEY_TOKEN: &str = "token";
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
pub const KEY_USER: &str = "user";

/// Persistence behind the session store. Implementations must tolerate reads
/// of keys that were never written.
pub trait SessionBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn delete(&self, key: &str) -> Result<(), ApiError>;
    fn is_available(&self) -> bool;
}

pub struct KeyringBackend {
    service: &'static str,
}

impl KeyringBackend {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE,
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, ApiError> {
        keyring::Entry::new(self.service, key).map_err(|_| ApiError::Storage)
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBackend for KeyringBackend {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let entry = self.entry(key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(keyring::Error::NoStorageAccess(_)) => Err(ApiError::Storage),
            Err(keyring::Error::PlatformFailure(_)) => Err(ApiError::Storage),
            Err(_) => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let entry = self.entry(key)?;
        entry.set_password(value).map_err(|_| ApiError::Storage)
    }

    fn delete(&self, key: &str) -> Result<(), ApiError> {
        if let Ok(entry) = self.entry(key) {
            let _ = entry.delete_credential();
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        let Ok(entry) = self.entry(KEY_TOKEN) else {
            return false;
        };
        match entry.get_password() {
            Ok(_) => true,
            Err(keyring::Error::NoEntry) => true,
            Err(keyring::Error::BadEncoding(_)) => true,
            Err(keyring::Error::Ambiguous(_)) => true,
            Err(keyring::Error::NoStorageAccess(_)) => false,
            Err(keyring::Error::PlatformFailure(_)) => false,
            Err(_) => false,
        }
    }
}

/// Process-local backend for tests and embedding.
#[derive(Default)]
pub struct MemoryBackend {
    values: std::sync::Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let values = self.values.lock().map_err(|_| ApiError::Storage)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let mut values = self.values.lock().map_err(|_| ApiError::Storage)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), ApiError> {
        let mut values = self.values.lock().map_err(|_| ApiError::Storage)?;
        values.remove(key);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Removes one pair of surrounding quote characters left behind when the
/// token was JSON-stringified into storage. Applied unconditionally, as the
/// browser client did.
fn strip_quote_artifacts(token: &str) -> &str {
    let token = token.trim();
    let token = token.strip_prefix('"').unwrap_or(token);
    token.strip_suffix('"').unwrap_or(token)
}

/// Explicit session-manager service: the single owner of the persisted
/// session (bearer token, refresh token, user descriptor). Set at login,
/// cleared at logout or refresh failure.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    token: Arc<Mutex<Option<String>>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            backend,
            token: Arc::new(Mutex::new(None)),
        }
    }

    pub fn keyring() -> Self {
        Self::new(Arc::new(KeyringBackend::new()))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Bearer token as it should be attached to a request: freshest stored
    /// value, quote artifacts stripped, empty values treated as absent.
    pub async fn access_token(&self) -> Result<Option<String>, ApiError> {
        let raw = {
            let mut cached = self.token.lock().await;
            match cached.clone() {
                Some(value) => Some(value),
                None => {
                    let loaded = self.backend.get(KEY_TOKEN)?;
                    *cached = loaded.clone();
                    loaded
                }
            }
        };

        Ok(raw
            .as_deref()
            .map(strip_quote_artifacts)
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    pub async fn set_access_token(&self, value: &str) -> Result<(), ApiError> {
        self.backend.set(KEY_TOKEN, value)?;
        let mut cached = self.token.lock().await;
        *cached = Some(value.to_string());
        Ok(())
    }

    pub async fn refresh_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self
            .backend
            .get(KEY_REFRESH_TOKEN)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    pub async fn set_refresh_token(&self, value: &str) -> Result<(), ApiError> {
        self.backend.set(KEY_REFRESH_TOKEN, value)
    }

    pub async fn user(&self) -> Result<Option<UserProfile>, ApiError> {
        let Some(raw) = self.backend.get(KEY_USER)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub async fn set_user(&self, user: &UserProfile) -> Result<(), ApiError> {
        let raw = serde_json::to_string(user)?;
        self.backend.set(KEY_USER, &raw)
    }

    /// Logout side effect: drops every persisted key and the in-memory
    /// token. Backend delete failures are ignored.
    pub async fn clear_session(&self) {
        for key in [KEY_TOKEN, KEY_REFRESH_TOKEN, KEY_USER] {
            let _ = self.backend.delete(key);
        }
        let mut cached = self.token.lock().await;
        *cached = None;
    }

    pub async fn has_session(&self) -> bool {
        matches!(self.access_token().await, Ok(Some(_)))
    }
}
