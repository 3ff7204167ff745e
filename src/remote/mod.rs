//! Collaborators of the synced task list: an authentication service that
//! knows who is signed in, and a document store that persists each user's
//! records and republishes full snapshots when they change.

pub mod memory;
pub mod synced;

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::mpsc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::task::{Task, TaskId, TaskList};

pub use memory::{MemoryAuth, MemoryStore};
pub use synced::SyncedTaskList;

/// Identity of a signed-in user; records are scoped by it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(name: impl Into<String>) -> Self {
        UserId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record as the store keeps it. Edit mode is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTask {
    pub id: TaskId,
    pub owner: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Self {
        Task::new(stored.id, stored.text)
    }
}

/// One owner's records, newest first
pub type Snapshot = Vec<StoredTask>;

/// Newest first; ties broken by id, descending
pub fn snapshot_order(a: &StoredTask, b: &StoredTask) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Turn a snapshot into view state. Every record arrives out of edit mode.
pub fn snapshot_to_list(snapshot: Snapshot) -> TaskList {
    TaskList::from_records(snapshot.into_iter().map(Task::from))
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user name must not be empty")]
    EmptyName,
    #[error("invalid user name '{0}': use letters, digits, '-', '_' or '.'")]
    InvalidName(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task text must not be empty")]
    EmptyText,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid store document {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
    #[error("lock error: {0}")]
    Lock(#[from] crate::io::lock::LockError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Signs users in and out
pub trait AuthService {
    /// Sign in as `name` (trimmed). Replaces any current session.
    fn sign_in(&mut self, name: &str) -> Result<UserId, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
    fn current_user(&self) -> Option<UserId>;
}

/// Durable per-user record storage with live snapshots
pub trait DocumentStore {
    /// Create a record and return the id the store assigned
    fn create(&self, owner: &UserId, text: &str) -> Result<TaskId, StoreError>;
    fn update(&self, owner: &UserId, id: &TaskId, text: &str) -> Result<(), StoreError>;
    fn delete(&self, owner: &UserId, id: &TaskId) -> Result<(), StoreError>;
    /// Current records for `owner`, newest first
    fn snapshot(&self, owner: &UserId) -> Result<Snapshot, StoreError>;
    /// Live feed of snapshots for `owner`. The current snapshot is
    /// delivered right away, then one after every change.
    fn subscribe(&self, owner: &UserId) -> Result<Subscription, StoreError>;
}

/// Receiving end of a snapshot feed.
///
/// Dropping it ends the feed. A store may attach a guard (for example a
/// filesystem watcher) that has to live as long as the receiver.
pub struct Subscription {
    rx: mpsc::Receiver<Snapshot>,
    _guard: Option<Box<dyn Any + Send>>,
}

impl Subscription {
    pub fn new(rx: mpsc::Receiver<Snapshot>) -> Self {
        Subscription { rx, _guard: None }
    }

    pub fn with_guard(rx: mpsc::Receiver<Snapshot>, guard: impl Any + Send) -> Self {
        Subscription {
            rx,
            _guard: Some(Box::new(guard)),
        }
    }

    /// Non-blocking: drain everything queued and return the newest
    /// snapshot, if any arrived. Older ones are superseded.
    pub fn poll(&self) -> Option<Snapshot> {
        let mut latest = None;
        while let Ok(snapshot) = self.rx.try_recv() {
            latest = Some(snapshot);
        }
        latest
    }

    /// Block until the next snapshot arrives or the timeout passes
    pub fn wait(&self, timeout: std::time::Duration) -> Option<Snapshot> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("guarded", &self._guard.is_some())
            .finish()
    }
}

/// Check a user name for use as an identity (and as a file name by the
/// file-backed store). Returns the trimmed name.
pub fn validate_user_name(name: &str) -> Result<&str, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::EmptyName);
    }
    let ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !name.starts_with('.');
    if !ok {
        return Err(AuthError::InvalidName(name.to_string()));
    }
    Ok(name)
}
