//! Recent keyword query history
//!
//! Bounded, most-recent-first, de-duplicated case-insensitively. Backed by a
//! JSON array of strings on disk so it survives restarts, unlike the result
//! cache. Persistence failures are logged and never reach the search path.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::HistoryConfig;
use crate::error::HistoryError;

pub struct QueryHistory {
    entries: Mutex<Vec<String>>,
    /// Held from mutation through the file write so saves land in mutation order
    write_lock: tokio::sync::Mutex<()>,
    capacity: usize,
    path: Option<PathBuf>,
}

impl QueryHistory {
    /// History with no backing file
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            write_lock: tokio::sync::Mutex::new(()),
            capacity: capacity.max(1),
            path: None,
        }
    }

    /// Open a file-backed history, starting empty if the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let capacity = capacity.max(1);

        let mut entries = match load(&path) {
            Ok(entries) => entries,
            Err(HistoryError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not load query history");
                Vec::new()
            }
        };
        entries.truncate(capacity);

        Self {
            entries: Mutex::new(entries),
            write_lock: tokio::sync::Mutex::new(()),
            capacity,
            path: Some(path),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        match config.resolved_path() {
            Some(path) => Self::open(path, config.capacity),
            None => Self::in_memory(config.capacity),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move a query to the front, dropping any case-insensitive duplicate
    pub async fn record(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let _write = self.write_lock.lock().await;
        let snapshot = {
            let mut entries = self.lock();
            let folded = query.to_lowercase();
            entries.retain(|existing| existing.to_lowercase() != folded);
            entries.insert(0, query.to_string());
            entries.truncate(self.capacity);
            entries.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Most-recent-first copy of the history
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Remove a query, matched case-insensitively
    pub async fn remove(&self, query: &str) -> bool {
        let folded = query.trim().to_lowercase();

        let _write = self.write_lock.lock().await;
        let snapshot = {
            let mut entries = self.lock();
            let before = entries.len();
            entries.retain(|existing| existing.to_lowercase() != folded);
            if entries.len() == before {
                return false;
            }
            entries.clone()
        };
        self.persist(&snapshot).await;
        true
    }

    pub async fn clear(&self) {
        let _write = self.write_lock.lock().await;
        self.lock().clear();
        self.persist(&[]).await;
    }

    async fn persist(&self, entries: &[String]) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = save(path, entries).await {
            tracing::warn!(path = %path.display(), error = %e, "could not persist query history");
        }
    }
}

fn load(path: &Path) -> Result<Vec<String>, HistoryError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

async fn save(path: &Path, entries: &[String]) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
