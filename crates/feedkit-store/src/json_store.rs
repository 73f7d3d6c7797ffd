//! JSON-file-backed state store.
//!
//! One file per key under a caller-chosen data directory:
//!
//! - `favorites.json`: array of post ids
//! - `hidden.json`: array of post ids
//! - `posts.json`: last-fetched post list, wire shape
//!
//! Writes land in a temp file in the same directory and are renamed into
//! place. A write whose serialized bytes equal the current file contents is
//! skipped entirely.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use feedkit_core::{Post, PostId};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::state_store::StateStore;

const FAVORITES_FILE: &str = "favorites.json";
const HIDDEN_FILE: &str = "hidden.json";
const POSTS_FILE: &str = "posts.json";

/// Durable state store writing JSON files under a data directory.
#[derive(Debug)]
pub struct JsonStateStore {
    data_dir: PathBuf,
}

impl JsonStateStore {
    /// Open (creating if needed) a store rooted at `data_dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::io(&data_dir, e))?;
        Ok(Self { data_dir })
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Read a JSON file, returning `T::default()` when the file is absent.
    fn read_or_default<T>(&self, name: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.file_path(name);
        let contents = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        serde_json::from_slice(&contents)
            .map_err(|e| StoreError::serialization(&path, e.to_string()))
    }

    /// Serialize `value` and write it to `name`, atomically, skipping the
    /// write when the file already holds identical bytes.
    fn write_if_changed<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let bytes = serde_json::to_vec(value)
            .map_err(|e| StoreError::serialization(&path, e.to_string()))?;

        match fs::read(&path) {
            Ok(existing) if existing == bytes => {
                debug!(file = name, "store contents unchanged, skipping write");
                return Ok(());
            }
            _ => {}
        }

        let tmp = self.data_dir.join(format!("{name}.tmp"));
        fs::write(&tmp, &bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;
        debug!(file = name, bytes = bytes.len(), "store file written");
        Ok(())
    }

    fn remove_if_present(&self, name: &str) -> Result<(), StoreError> {
        let path = self.file_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(file = name, "store file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load_favorites(&self) -> Result<BTreeSet<PostId>, StoreError> {
        self.read_or_default(FAVORITES_FILE)
    }

    async fn save_favorites(&self, favorites: &BTreeSet<PostId>) -> Result<(), StoreError> {
        self.write_if_changed(FAVORITES_FILE, favorites)
    }

    async fn load_hidden(&self) -> Result<BTreeSet<PostId>, StoreError> {
        self.read_or_default(HIDDEN_FILE)
    }

    async fn save_hidden(&self, hidden: &BTreeSet<PostId>) -> Result<(), StoreError> {
        self.write_if_changed(HIDDEN_FILE, hidden)
    }

    async fn load_cached_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.read_or_default(POSTS_FILE)
    }

    async fn save_cached_posts(&self, posts: &[Post]) -> Result<(), StoreError> {
        self.write_if_changed(POSTS_FILE, &posts)
    }

    async fn clear_cached_posts(&self) -> Result<(), StoreError> {
        self.remove_if_present(POSTS_FILE)
    }
}
