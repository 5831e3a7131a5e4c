//! JSON-file key-value store scoped to one capability directory.
//!
//! Each key is stored as `<key>.json`. Writes go to a temporary sibling and
//! are renamed into place so a crash never leaves a half-written document.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::sync::Arc;

use crate::storage::ports::{KeyValueStore, StoreError, StoreResult};

const DOCUMENT_SUFFIX: &str = ".json";
const TEMP_SUFFIX: &str = ".json.tmp";

/// Key-value store persisting one JSON document per key.
#[derive(Debug, Clone)]
pub struct JsonFileKeyValueStore {
    dir: Arc<Dir>,
}

impl JsonFileKeyValueStore {
    /// Opens (creating when needed) the store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> StoreResult<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(StoreError::persistence)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(StoreError::persistence)?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> StoreResult<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))?
    }
}

fn document_name(key: &str) -> StoreResult<String> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid {
        return Err(StoreError::InvalidKey(key.to_owned()));
    }
    Ok(format!("{key}{DOCUMENT_SUFFIX}"))
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let name = document_name(key)?;
        self.blocking(move |dir| match dir.read_to_string(&name) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(StoreError::serialization),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::persistence(err)),
        })
        .await
    }

    async fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let name = document_name(key)?;
        let temp = format!("{key}{TEMP_SUFFIX}");
        let bytes = serde_json::to_vec(value).map_err(StoreError::serialization)?;
        self.blocking(move |dir| {
            let mut file = dir.create(&temp).map_err(StoreError::persistence)?;
            file.write_all(&bytes).map_err(StoreError::persistence)?;
            file.sync_all().map_err(StoreError::persistence)?;
            dir.rename(&temp, dir, &name)
                .map_err(StoreError::persistence)
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let name = document_name(key)?;
        self.blocking(move |dir| match dir.remove_file(&name) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::persistence(err)),
        })
        .await
    }
}
