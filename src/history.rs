//! # Search History
//!
//! Records snapshots of the active filters so a user can revisit or save a
//! search. Persistence goes through an injected [`HistoryStore`] backend,
//! in-memory for tests or a JSON file for a desktop session, never a bare
//! global.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::FilterSet;

/// Maximum number of recent searches retained.
const DEFAULT_CAPACITY: usize = 20;

/// A snapshot of the active filters at search time.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct HistoryEntry {
    /// Unique entry identifier.
    pub id: String,

    /// The filters that were active.
    pub filters: FilterSet,

    /// When the search ran.
    pub timestamp: DateTime<Utc>,
}

/// A search the user explicitly saved under a name.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SavedSearch {
    /// Unique identifier.
    pub id: String,

    /// User-chosen name.
    pub name: String,

    /// The saved filters.
    pub filters: FilterSet,

    /// When the search was saved.
    pub timestamp: DateTime<Utc>,
}

/// The persisted history document: recent searches (most recent first) and
/// named saved searches.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct History {
    /// Recent searches, most recent first.
    pub recent: Vec<HistoryEntry>,

    /// Saved searches.
    pub saved: Vec<SavedSearch>,
}

/// Storage backend for search history.
pub trait HistoryStore: Send + Sync {
    /// Load the persisted history, if any exists.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> anyhow::Result<Option<History>>;

    /// Persist the history.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn save(&self, history: &History) -> anyhow::Result<()>;
}

impl<S: HistoryStore + ?Sized> HistoryStore for &S {
    fn load(&self) -> anyhow::Result<Option<History>> {
        (**self).load()
    }

    fn save(&self, history: &History) -> anyhow::Result<()> {
        (**self).save(history)
    }
}

/// Search history service for one UI session.
pub struct SearchHistory<S: HistoryStore> {
    store: S,
    history: History,
    capacity: usize,
}

impl<S: HistoryStore> SearchHistory<S> {
    /// Open the history, loading any persisted state from the store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open(store: S) -> anyhow::Result<Self> {
        let history = store.load()?.unwrap_or_default();
        Ok(Self {
            store,
            history,
            capacity: DEFAULT_CAPACITY,
        })
    }

    /// Override the number of recent searches retained.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Record the active filters as a recent search. Empty filter sets are
    /// not recorded. The most recent entry comes first and the list is
    /// capped at the configured capacity.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn record(&mut self, filters: &FilterSet) -> anyhow::Result<()> {
        if filters.is_empty() {
            return Ok(());
        }
        if self.history.recent.first().is_some_and(|e| &e.filters == filters) {
            return Ok(());
        }

        self.history.recent.insert(0, HistoryEntry {
            id: Uuid::new_v4().to_string(),
            filters: filters.clone(),
            timestamp: Utc::now(),
        });
        self.history.recent.truncate(self.capacity);
        self.store.save(&self.history)
    }

    /// Save the active filters under a name.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn save_search(&mut self, name: impl Into<String>, filters: &FilterSet) -> anyhow::Result<()> {
        self.history.saved.push(SavedSearch {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            filters: filters.clone(),
            timestamp: Utc::now(),
        });
        self.store.save(&self.history)
    }

    /// Delete a recent entry by id.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn delete_recent(&mut self, id: &str) -> anyhow::Result<()> {
        self.history.recent.retain(|e| e.id != id);
        self.store.save(&self.history)
    }

    /// Delete a saved search by id.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn delete_saved(&mut self, id: &str) -> anyhow::Result<()> {
        self.history.saved.retain(|s| s.id != id);
        self.store.save(&self.history)
    }

    /// Recent searches, most recent first.
    #[must_use]
    pub fn recent(&self) -> &[HistoryEntry] {
        &self.history.recent
    }

    /// Saved searches.
    #[must_use]
    pub fn saved(&self) -> &[SavedSearch] {
        &self.history.saved
    }
}

/// In-memory history store, used in tests.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    history: Mutex<Option<History>>,
}

impl InMemoryHistory {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistory {
    fn load(&self) -> anyhow::Result<Option<History>> {
        let guard = self.history.lock().map_err(|_| anyhow::anyhow!("history lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, history: &History) -> anyhow::Result<()> {
        let mut guard =
            self.history.lock().map_err(|_| anyhow::anyhow!("history lock poisoned"))?;
        *guard = Some(history.clone());
        Ok(())
    }
}

/// JSON-file-backed history store.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
}

impl FileHistory {
    /// Create a store persisting to the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for FileHistory {
    fn load(&self) -> anyhow::Result<Option<History>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&self, history: &History) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(history)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
