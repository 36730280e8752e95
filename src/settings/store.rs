use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{InMemoryStorage, KeyValueStorage, Setting, StorageError};
use crate::transport::TokenSource;

/// Key under which the bearer token is persisted.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

const CHANGE_CAPACITY: usize = 16;

/// Published after a key is saved or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    pub key: &'static str,
}

/// Process-wide settings over a [`KeyValueStorage`].
///
/// Clone-friendly via Arc: clones share the backend and the change channel.
#[derive(Clone)]
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStorage>,
    changes: broadcast::Sender<SettingsChange>,
}

impl SettingsStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            storage: Arc::new(storage),
            changes,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(InMemoryStorage::new())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }

    /// Read `S`, merging stored top-level fields over `S::default()`.
    ///
    /// Missing keys give the default. A stored blob that is not a JSON
    /// object, or does not fit `S` after merging, is ignored with a warning.
    pub fn load<S: Setting>(&self) -> Result<S, StorageError> {
        match self.storage.read(S::KEY)? {
            Some(raw) => Ok(merge_with_defaults(S::KEY, &raw)),
            None => Ok(S::default()),
        }
    }

    /// Write `value` wholesale.
    pub fn save<S: Setting>(&self, value: &S) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.storage.write(S::KEY, &raw)?;
        self.notify(S::KEY);
        Ok(())
    }

    /// Remove `S`; later loads give the default.
    pub fn clear<S: Setting>(&self) -> Result<(), StorageError> {
        if self.storage.delete(S::KEY)? {
            self.notify(S::KEY);
        }
        Ok(())
    }

    /// The persisted bearer token. Accepts a JSON string as written by
    /// [`save_auth_token`](Self::save_auth_token) or a bare token written by
    /// other tools.
    pub fn auth_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .read(AUTH_TOKEN_KEY)?
            .and_then(|raw| parse_token(&raw)))
    }

    pub fn save_auth_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage
            .write(AUTH_TOKEN_KEY, &serde_json::to_string(token)?)?;
        self.notify(AUTH_TOKEN_KEY);
        Ok(())
    }

    /// Sign out.
    pub fn clear_auth_token(&self) -> Result<(), StorageError> {
        if self.storage.delete(AUTH_TOKEN_KEY)? {
            self.notify(AUTH_TOKEN_KEY);
        }
        Ok(())
    }

    fn notify(&self, key: &'static str) {
        debug!(key, "settings changed");
        let _ = self.changes.send(SettingsChange { key });
    }
}

impl TokenSource for SettingsStore {
    fn token(&self) -> Option<String> {
        self.auth_token().unwrap_or_else(|err| {
            warn!(error = %err, "could not read auth token");
            None
        })
    }
}

fn parse_token(raw: &str) -> Option<String> {
    serde_json::from_str::<Option<String>>(raw)
        .unwrap_or_else(|_| Some(raw.trim().to_string()))
        .filter(|token| !token.is_empty())
}

fn merge_with_defaults<S: Setting>(key: &str, raw: &str) -> S {
    let overrides = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => {
            warn!(key, "stored settings are not a JSON object, using defaults");
            return S::default();
        }
    };

    let mut merged = match serde_json::to_value(S::default()) {
        Ok(Value::Object(map)) => map,
        _ => return S::default(),
    };
    merged.extend(overrides);

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|err| {
        warn!(key, error = %err, "stored settings do not fit, using defaults");
        S::default()
    })
}
