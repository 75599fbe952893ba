//! polar-db
//!
//! JSON-backed repository of polar records, keyed by (name, source).
//! The whole store is loaded and saved as a single unit (read-modify-
//! write, no incremental transactions); persistence beyond that file
//! contract is the caller's business.
//!
//! A process usually works against one database file, so an explicit
//! shared instance is provided: [`init_shared`] loads it exactly once
//! at startup and [`shared`] hands out the `RwLock` around it. Nothing
//! initializes lazily behind the caller's back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use thiserror::Error;

use polar_glider::{GliderError, GliderPolar, Method, PolarRecord};

/// Separator the UI layer puts between name and source in display keys.
const KEY_SEPARATOR: &str = " / ";

// Key fields are named `source_name`: thiserror reserves `source` for
// chained errors, and these carry identity text.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no polar entry named {name} / {source_name}")]
    NotFound { name: String, source_name: String },
    #[error("more than one polar entry named {name} / {source_name}")]
    AmbiguousKey { name: String, source_name: String },
    #[error("a polar named {name} / {source_name} already exists")]
    DuplicateKey { name: String, source_name: String },
    #[error("shared polar store has not been initialized; call init_shared first")]
    Uninitialized,
    #[error("shared polar store is already initialized from {path}")]
    AlreadyInitialized { path: PathBuf },
    #[error(transparent)]
    Glider(#[from] GliderError),
    #[error("reading polar store: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing polar store: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered collection of polar records with unique (name, source) keys.
#[derive(Debug)]
pub struct PolarStore {
    path: PathBuf,
    records: Vec<PolarRecord>,
}

impl PolarStore {
    /// Loads the whole JSON array from `path`, rejecting duplicate keys
    /// up front so later lookups cannot turn ambiguous.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let text = fs::read_to_string(&path)?;
        let records: Vec<PolarRecord> = serde_json::from_str(&text)?;
        Self::from_records(path, records)
    }

    /// Builds a store from in-memory records (same key checks as
    /// [`load`](Self::load)); `path` is where [`save`](Self::save)
    /// will write.
    pub fn from_records(
        path: impl Into<PathBuf>,
        records: Vec<PolarRecord>,
    ) -> Result<Self, StoreError> {
        for (i, record) in records.iter().enumerate() {
            if records[..i].iter().any(|r| same_key(r, &record.name, &record.source)) {
                return Err(StoreError::DuplicateKey {
                    name: record.name.clone(),
                    source_name: record.source.clone(),
                });
            }
        }
        Ok(Self { path: path.into(), records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[PolarRecord] {
        &self.records
    }

    /// Display keys of all records whose method is one of `methods`,
    /// in insertion order.
    pub fn find_by_method(&self, methods: &[Method]) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| methods.iter().any(|m| m.as_str() == r.method))
            .map(|r| display_key(&r.name, &r.source))
            .collect()
    }

    /// Builds the glider polar stored under (name, source).
    ///
    /// The duplicate scan is defensive: insertion and load both reject
    /// collisions, so `AmbiguousKey` here means the backing collection
    /// was corrupted out-of-band.
    pub fn get(&self, name: &str, source: &str) -> Result<GliderPolar, StoreError> {
        let mut matches = self.records.iter().filter(|r| same_key(r, name, source));
        let record = matches.next().ok_or_else(|| StoreError::NotFound {
            name: name.to_owned(),
            source_name: source.to_owned(),
        })?;
        if matches.next().is_some() {
            return Err(StoreError::AmbiguousKey {
                name: name.to_owned(),
                source_name: source.to_owned(),
            });
        }
        Ok(GliderPolar::from_record(record)?)
    }

    /// Appends a record, failing on a (name, source) collision.
    pub fn add(&mut self, record: PolarRecord) -> Result<(), StoreError> {
        if self.records.iter().any(|r| same_key(r, &record.name, &record.source)) {
            return Err(StoreError::DuplicateKey {
                name: record.name,
                source_name: record.source,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Writes the whole store back to its backing file.
    pub fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

fn same_key(record: &PolarRecord, name: &str, source: &str) -> bool {
    record.name == name && record.source == source
}

/// `"name / source"`, the key string the UI layer renders.
pub fn display_key(name: &str, source: &str) -> String {
    format!("{name}{KEY_SEPARATOR}{source}")
}

/// Splits a display key back into (name, source) on the first
/// `" / "`. Names containing the separator break this contract; that
/// fragility is part of the historical boundary and kept as-is.
pub fn parse_display_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(KEY_SEPARATOR)
}

/* --------------------------- shared instance --------------------------- */

static SHARED: OnceLock<RwLock<PolarStore>> = OnceLock::new();

/// Loads the process-wide store from `path`. Must be called exactly
/// once, before any [`shared`] access; a second call fails.
pub fn init_shared(path: impl Into<PathBuf>) -> Result<(), StoreError> {
    let store = PolarStore::load(path)?;
    let path = store.path.clone();
    SHARED
        .set(RwLock::new(store))
        .map_err(|_| StoreError::AlreadyInitialized { path })
}

/// The process-wide store; fails if [`init_shared`] never ran. Reads
/// take the read lock; `add`/`save` need the write lock.
pub fn shared() -> Result<&'static RwLock<PolarStore>, StoreError> {
    SHARED.get().ok_or(StoreError::Uninitialized)
}
