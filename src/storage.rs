//! Storage layer for pms
//!
//! Every entity type lives in its own backing file inside the data
//! directory. Each file holds the full ordered collection as a pretty-printed
//! JSON array and is rewritten in full on every mutation.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//!   pms.toml              # Optional configuration
//!   users.json            # User snapshot
//!   projects.json         # Project snapshot
//!   tasks.json            # Task snapshot
//!   *.json.lock           # Advisory locks taken during rewrites
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock;

/// A record kept in an [`EntityStore`]
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Human-readable entity name used in errors and logs
    const NAME: &'static str;

    fn id(&self) -> u32;

    fn set_id(&mut self, id: u32);
}

/// Resolved locations of the backing files
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    config: Config,
}

impl Storage {
    pub fn new(data_dir: PathBuf, config: Config) -> Self {
        Self { data_dir, config }
    }

    /// Storage for a data directory, reading `pms.toml` when present
    pub fn for_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let config = Config::load_from_dir(&data_dir);
        Self::new(data_dir, config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.files.users)
    }

    pub fn projects_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.files.projects)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.files.tasks)
    }

    /// Create the data directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Open the store for one entity type at `path`
    pub fn open_store<T: Entity>(&self, path: PathBuf) -> Result<EntityStore<T>> {
        EntityStore::open(path, self.config.storage.lock_timeout_ms)
    }
}

/// In-memory ordered collection mirrored to one backing file
///
/// The snapshot is loaded once when the store is opened. Every mutation
/// rewrites the whole file before returning, and the in-memory snapshot is
/// only replaced once that rewrite succeeded.
#[derive(Debug)]
pub struct EntityStore<T> {
    path: PathBuf,
    lock_timeout_ms: u64,
    records: Mutex<Vec<T>>,
}

impl<T: Entity> EntityStore<T> {
    /// Load the snapshot at `path`, creating an empty file if none exists
    pub fn open(path: impl Into<PathBuf>, lock_timeout_ms: u64) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            read_snapshot(&path)?
        } else {
            let empty: Vec<T> = Vec::new();
            write_snapshot(&path, &empty, lock_timeout_ms)?;
            empty
        };

        tracing::debug!(
            entity = T::NAME,
            path = %path.display(),
            count = records.len(),
            "loaded snapshot"
        );

        Ok(Self {
            path,
            lock_timeout_ms,
            records: Mutex::new(records),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_by_id(&self, id: u32) -> Option<T> {
        self.find(|record| record.id() == id)
    }

    /// Copy of the full snapshot in insertion order
    pub fn get_all(&self) -> Vec<T> {
        self.snapshot().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// First record matching `predicate`
    pub fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.snapshot().iter().find(|record| predicate(*record)).cloned()
    }

    /// All records matching `predicate`, in snapshot order
    pub fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.snapshot()
            .iter()
            .filter(|record| predicate(*record))
            .cloned()
            .collect()
    }

    /// Assign the next identifier, append, and rewrite the file
    pub fn create(&self, mut entity: T) -> Result<T> {
        let mut records = self.snapshot();
        entity.set_id(next_id(&records)?);

        let mut next = records.clone();
        next.push(entity.clone());
        self.commit(&mut records, next)?;

        tracing::info!(entity = T::NAME, id = entity.id(), "created");
        Ok(entity)
    }

    /// Replace the record with the same identifier, keeping its position
    pub fn update(&self, entity: T) -> Result<T> {
        let mut records = self.snapshot();
        let index = records
            .iter()
            .position(|record| record.id() == entity.id())
            .ok_or_else(|| Error::not_found(T::NAME, entity.id()))?;

        let mut next = records.clone();
        next[index] = entity.clone();
        self.commit(&mut records, next)?;

        tracing::debug!(entity = T::NAME, id = entity.id(), "updated");
        Ok(entity)
    }

    /// Remove the record with `id`; `false` if there was none
    pub fn delete(&self, id: u32) -> Result<bool> {
        let mut records = self.snapshot();
        let Some(index) = records.iter().position(|record| record.id() == id) else {
            return Ok(false);
        };

        let mut next = records.clone();
        next.remove(index);
        self.commit(&mut records, next)?;

        tracing::info!(entity = T::NAME, id, "deleted");
        Ok(true)
    }

    fn commit(&self, records: &mut Vec<T>, next: Vec<T>) -> Result<()> {
        write_snapshot(&self.path, &next, self.lock_timeout_ms)?;
        *records = next;
        tracing::debug!(
            entity = T::NAME,
            path = %self.path.display(),
            count = records.len(),
            "rewrote snapshot"
        );
        Ok(())
    }

    fn snapshot(&self) -> MutexGuard<'_, Vec<T>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `max(existing) + 1`, or 1 for an empty collection
fn next_id<T: Entity>(records: &[T]) -> Result<u32> {
    match records.iter().map(Entity::id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            Error::InvalidArgument(format!("{} identifiers exhausted", T::NAME))
        }),
    }
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<T> = serde_json::from_str(&content)?;
    Ok(records)
}

fn write_snapshot<T: Serialize>(path: &Path, records: &[T], timeout_ms: u64) -> Result<()> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    lock::write_atomic_locked(path, json.as_bytes(), timeout_ms)
}
