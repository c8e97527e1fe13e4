use std::collections::HashMap;
use std::sync::RwLock;

use backoffice_catalog::ConfigurationStore;

/// Configuration held in memory, seeded at startup.
#[derive(Debug, Default)]
pub struct InMemoryConfiguration {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value.into());
        }
    }
}

impl ConfigurationStore for InMemoryConfiguration {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}
