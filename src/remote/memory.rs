use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

use super::{
    AuthError, AuthService, DocumentStore, Snapshot, StoreError, StoredTask, Subscription, UserId,
    snapshot_order, validate_user_name,
};
use crate::model::task::TaskId;
use crate::ops::task_ops::clean_text;

/// In-process document store. Clones share the same records, so one
/// clone can be handed to a synced list while a test drives another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<StoredTask>,
    subscribers: Vec<(UserId, Sender<Snapshot>)>,
    seq: u64,
    last_created: Option<DateTime<Utc>>,
    unavailable: bool,
}

impl Inner {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("memory store offline".into()))
        } else {
            Ok(())
        }
    }

    fn snapshot(&self, owner: &UserId) -> Snapshot {
        let mut records: Snapshot = self
            .records
            .iter()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect();
        records.sort_by(snapshot_order);
        records
    }

    fn publish(&mut self, owner: &UserId) {
        let snapshot = self.snapshot(owner);
        self.subscribers
            .retain(|(who, tx)| who != owner || tx.send(snapshot.clone()).is_ok());
    }

    /// Creation times never repeat, so ordering is stable
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(at);
        at
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.unavailable = unavailable;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))
    }
}

impl DocumentStore for MemoryStore {
    fn create(&self, owner: &UserId, text: &str) -> Result<TaskId, StoreError> {
        let text = clean_text(text).ok_or(StoreError::EmptyText)?;
        let mut inner = self.lock()?;
        inner.check_available()?;
        inner.seq += 1;
        let id = TaskId::new(format!("m{:06}", inner.seq));
        let created_at = inner.next_created_at();
        inner.records.push(StoredTask {
            id: id.clone(),
            owner: owner.clone(),
            text: text.to_string(),
            created_at,
        });
        inner.publish(owner);
        Ok(id)
    }

    fn update(&self, owner: &UserId, id: &TaskId, text: &str) -> Result<(), StoreError> {
        let text = clean_text(text).ok_or(StoreError::EmptyText)?;
        let mut inner = self.lock()?;
        inner.check_available()?;
        let record = inner
            .records
            .iter_mut()
            .find(|r| &r.owner == owner && &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        record.text = text.to_string();
        inner.publish(owner);
        Ok(())
    }

    fn delete(&self, owner: &UserId, id: &TaskId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.check_available()?;
        let before = inner.records.len();
        inner.records.retain(|r| !(&r.owner == owner && &r.id == id));
        if inner.records.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        inner.publish(owner);
        Ok(())
    }

    fn snapshot(&self, owner: &UserId) -> Result<Snapshot, StoreError> {
        let inner = self.lock()?;
        inner.check_available()?;
        Ok(inner.snapshot(owner))
    }

    fn subscribe(&self, owner: &UserId) -> Result<Subscription, StoreError> {
        let mut inner = self.lock()?;
        inner.check_available()?;
        let (tx, rx) = mpsc::channel();
        // Receiver is alive, so the first send cannot fail
        let _ = tx.send(inner.snapshot(owner));
        inner.subscribers.push((owner.clone(), tx));
        Ok(Subscription::new(rx))
    }
}

/// In-process auth service; any well-formed name signs in
#[derive(Debug, Clone, Default)]
pub struct MemoryAuth {
    current: Option<UserId>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthService for MemoryAuth {
    fn sign_in(&mut self, name: &str) -> Result<UserId, AuthError> {
        let user = UserId::new(validate_user_name(name)?);
        self.current = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        self.current = None;
        Ok(())
    }

    fn current_user(&self) -> Option<UserId> {
        self.current.clone()
    }
}
