use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

/// String key-value storage as the host device exposes it. The rest of the
/// device core only ever talks to this trait, so the app shell can plug in
/// whatever the platform offers.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for &T {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key).await
    }
}

/// In-memory store for tests and previews.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk. Writes rewrite the whole
/// file, which is fine at the handful-of-keys scale the device core uses.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "store file unreadable, starting empty");
                HashMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn flush(&self, entries: &HashMap<String, String>) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        self.flush(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme").await.unwrap(), None);

        store.set("theme", "dark").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));

        store.remove("theme").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.set("wallet-balance", "42.5").await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("wallet-balance").await.unwrap().as_deref(),
            Some("42.5")
        );
    }

    #[tokio::test]
    async fn file_store_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
    }
}
