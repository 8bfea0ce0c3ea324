//! Persistent key/value configuration, as seen by the enricher.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConfigError;

/// Key of the session token used for the CSRF header.
pub const SESSION_TOKEN_KEY: &str = "session-token";
/// Key of the user's applicant threshold.
pub const LIMIT_KEY: &str = "limit";

/// Read access to the host's persistent configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync + 'static {
    /// Stored value for `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, ConfigError>;
}

/// Process-local store for tests and the CLI.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        match self.values.write() {
            Ok(mut guard) => guard.insert(key.into(), value),
            Err(poisoned) => poisoned.into_inner().insert(key.into(), value),
        };
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        match self.values.write() {
            Ok(mut guard) => guard.remove(key),
            Err(poisoned) => poisoned.into_inner().remove(key),
        }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        let values = self
            .values
            .read()
            .map_err(|_| ConfigError::Unavailable("lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_get_remove() {
        let store = InMemoryConfigStore::new();
        assert_eq!(store.get(LIMIT_KEY).await.unwrap(), None);

        store.set(LIMIT_KEY, json!(120));
        assert_eq!(store.get(LIMIT_KEY).await.unwrap(), Some(json!(120)));

        assert_eq!(store.remove(LIMIT_KEY), Some(json!(120)));
        assert_eq!(store.get(LIMIT_KEY).await.unwrap(), None);
    }
}
