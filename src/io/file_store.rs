use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::io::lock::FileLock;
use crate::io::watcher::FileWatcher;
use crate::model::task::TaskId;
use crate::ops::task_ops::clean_text;
use crate::remote::{
    DocumentStore, Snapshot, StoreError, StoredTask, Subscription, UserId, snapshot_order,
};

/// Default wait for another process to release the store lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Document store kept on the local filesystem.
///
/// Each owner's records live in `<dir>/<owner>.json`. Writes take the
/// store lock and replace the file atomically; subscribers re-read the
/// file whenever the watcher sees it change.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    lock_timeout: Duration,
}

/// On-disk shape of one owner's document
#[derive(Debug, Default, Serialize, Deserialize)]
struct OwnerDocument {
    #[serde(default)]
    records: IndexMap<TaskId, RecordBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordBody {
    text: String,
    created_at: DateTime<Utc>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(owner: &UserId) -> String {
        format!("{}.json", owner.as_str())
    }

    fn owner_path(&self, owner: &UserId) -> PathBuf {
        self.dir.join(Self::file_name(owner))
    }

    /// Read-modify-write of one owner's document under the store lock
    fn modify<T>(
        &self,
        owner: &UserId,
        f: impl FnOnce(&mut OwnerDocument) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _lock = FileLock::acquire(&self.dir, self.lock_timeout)?;
        let path = self.owner_path(owner);
        let mut doc = read_document(&path)?;
        let out = f(&mut doc)?;
        let content = serde_json::to_string_pretty(&doc).map_err(|e| StoreError::Decode {
            path: path.display().to_string(),
            source: e,
        })?;
        atomic_write(&path, content.as_bytes())?;
        Ok(out)
    }
}

fn read_document(path: &Path) -> Result<OwnerDocument, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(OwnerDocument::default()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content).map_err(|e| StoreError::Decode {
        path: path.display().to_string(),
        source: e,
    })
}

fn document_snapshot(owner: &UserId, doc: OwnerDocument) -> Snapshot {
    let mut records: Snapshot = doc
        .records
        .into_iter()
        .map(|(id, body)| StoredTask {
            id,
            owner: owner.clone(),
            text: body.text,
            created_at: body.created_at,
        })
        .collect();
    records.sort_by(snapshot_order);
    records
}

fn read_snapshot(path: &Path, owner: &UserId) -> Result<Snapshot, StoreError> {
    Ok(document_snapshot(owner, read_document(path)?))
}

/// Write a file atomically: temp file in the same directory, then rename
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl DocumentStore for FileStore {
    fn create(&self, owner: &UserId, text: &str) -> Result<TaskId, StoreError> {
        let text = clean_text(text).ok_or(StoreError::EmptyText)?;
        let id = TaskId::new(Uuid::new_v4().simple().to_string());
        self.modify(owner, |doc| {
            // Keep creation times strictly increasing within a document
            let now = Utc::now();
            let created_at = match doc.records.values().map(|r| r.created_at).max() {
                Some(latest) if now <= latest => latest + chrono::Duration::microseconds(1),
                _ => now,
            };
            doc.records.insert(
                id.clone(),
                RecordBody {
                    text: text.to_string(),
                    created_at,
                },
            );
            Ok(())
        })?;
        debug!(owner = %owner, %id, "record created");
        Ok(id)
    }

    fn update(&self, owner: &UserId, id: &TaskId, text: &str) -> Result<(), StoreError> {
        let text = clean_text(text).ok_or(StoreError::EmptyText)?;
        self.modify(owner, |doc| {
            let record = doc
                .records
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            record.text = text.to_string();
            Ok(())
        })?;
        debug!(owner = %owner, %id, "record updated");
        Ok(())
    }

    fn delete(&self, owner: &UserId, id: &TaskId) -> Result<(), StoreError> {
        self.modify(owner, |doc| {
            doc.records
                .shift_remove(id)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(id.clone()))
        })?;
        debug!(owner = %owner, %id, "record deleted");
        Ok(())
    }

    fn snapshot(&self, owner: &UserId) -> Result<Snapshot, StoreError> {
        read_snapshot(&self.owner_path(owner), owner)
    }

    fn subscribe(&self, owner: &UserId) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::channel();
        let path = self.owner_path(owner);

        let watched_owner = owner.clone();
        let watched_path = path.clone();
        let watch_tx = tx.clone();
        let watcher = FileWatcher::start(&self.dir, &Self::file_name(owner), move || {
            match read_snapshot(&watched_path, &watched_owner) {
                Ok(snapshot) => {
                    let _ = watch_tx.send(snapshot);
                }
                Err(e) => warn!(owner = %watched_owner, error = %e, "could not re-read store"),
            }
        })?;

        // Sent after the watcher is live so no change can slip between
        let _ = tx.send(read_snapshot(&path, owner)?);
        Ok(Subscription::with_guard(rx, watcher))
    }
}
