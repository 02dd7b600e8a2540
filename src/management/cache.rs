use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::{Res, types::Credential};

/// Single-record credential store backed by a JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the cache,
/// so a concurrent reader sees either the old or the new record. Clones
/// share one lock, serializing read-modify-write within the process.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached credential, or `None` when no cache file exists.
    pub async fn load(&self) -> Res<Option<Credential>> {
        let _guard = self.lock.lock().await;

        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credential: Credential = serde_json::from_str(&content)?;
        Ok(Some(credential))
    }

    /// Overwrites the cache with `credential`.
    pub async fn store(&self, credential: &Credential) -> Res<()> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        let tmp = self.tmp_path();
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Removes the cache file. A missing file is not an error.
    pub async fn clear(&self) -> Res<()> {
        let _guard = self.lock.lock().await;

        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "token.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{Duration, Utc};

    use super::*;

    fn credential(access: &str) -> Credential {
        Credential {
            access_token: access.to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            scope: BTreeSet::from(["user-read-playback-state".to_string()]),
        }
    }

    #[tokio::test]
    async fn missing_file_is_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));
        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("nested/cache/token.json"));

        cache.store(&credential("first")).await.unwrap();
        cache.store(&credential("second")).await.unwrap();

        let loaded = cache.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "second");
        assert!(!dir.path().join("nested/cache/token.json.tmp").exists());
    }

    #[tokio::test]
    async fn clear_removes_record_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));

        cache.store(&credential("first")).await.unwrap();
        cache.clear().await.unwrap();
        assert!(cache.load().await.unwrap().is_none());

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();

        let cache = TokenCache::new(path);
        assert!(cache.load().await.is_err());
    }
}
