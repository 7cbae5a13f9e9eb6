//! Persisted blob store
//!
//! The application keeps its state as named JSON blobs, one per concern.
//! Components never touch the filesystem
//! directly; they go through the [`BlobStore`] trait, so tests run against
//! an in-memory implementation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{PlanrsError, Result};

/// Persisted blob keys
pub mod keys {
    /// Onboarded user profile
    pub const USER_PROFILE: &str = "user_profile";
    /// Full exercise catalog, administrative view
    pub const CATALOG_ADMIN: &str = "exercise_catalog_admin";
    /// Derived active-only catalog, consumed by the planner
    pub const CATALOG_ACTIVE: &str = "exercise_catalog";
    /// Weekly plan, weekday -> workout list
    pub const WEEKLY_PLAN: &str = "weekly_plan";
    /// Append-only workout history
    pub const HISTORY: &str = "workout_history";

    pub const ALL: [&str; 5] = [
        USER_PROFILE,
        CATALOG_ADMIN,
        CATALOG_ACTIVE,
        WEEKLY_PLAN,
        HISTORY,
    ];
}

/// Named JSON blob storage
pub trait BlobStore {
    /// Read the raw blob under `key`, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write the raw blob under `key`, replacing any previous value
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob under `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Deserialize the blob under `key`, substituting the default when the key
/// is absent. A malformed blob is logged, cleared, and replaced by the
/// default rather than surfaced as an error.
pub fn load_or_default<T, S>(store: &mut S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: BlobStore + ?Sized,
{
    Ok(load_optional(store, key)?.unwrap_or_default())
}

/// Like [`load_or_default`] but distinguishes "never written" from
/// "written": corrupt blobs are still cleared and reported as `None`.
pub fn load_optional<T, S>(store: &mut S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: BlobStore + ?Sized,
{
    let Some(raw) = store.read(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(key, %err, "clearing malformed persisted blob");
            store.remove(key)?;
            Ok(None)
        }
    }
}

/// Serialize `value` into the blob under `key`
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: BlobStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.write(key, &raw)
}

/// Remove every application blob (the "reset everything" control)
pub fn reset_all<S: BlobStore + ?Sized>(store: &mut S) -> Result<()> {
    for key in keys::ALL {
        store.remove(key)?;
    }
    Ok(())
}

/// File-backed store: one `<key>.json` file per blob under a data directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| PlanrsError::Store(format!("cannot create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PlanrsError::Store(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|e| PlanrsError::Store(format!("cannot write {}: {}", path.display(), e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PlanrsError::Store(format!(
                "cannot remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// In-memory store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }
}
