use tracing::{debug, error, info, warn};

use super::{AuthError, AuthService, DocumentStore, Subscription, UserId, snapshot_to_list};
use crate::model::task::{Task, TaskId, TaskList};
use crate::ops::task_ops::{self, Command, clean_text};

/// Task list mirrored from a document store.
///
/// Writes go to the store; the view only changes when the store publishes
/// a snapshot, which replaces it wholesale. Edit mode lives only here and
/// is never sent to the store. Store failures are logged and swallowed.
pub struct SyncedTaskList<S, A> {
    store: S,
    auth: A,
    view: TaskList,
    subscription: Option<Subscription>,
}

impl<S: DocumentStore, A: AuthService> SyncedTaskList<S, A> {
    /// Wrap a store and auth service. If the auth service already has a
    /// signed-in user (a restored session), subscribe right away.
    pub fn new(store: S, auth: A) -> Self {
        let mut list = SyncedTaskList {
            store,
            auth,
            view: TaskList::new(),
            subscription: None,
        };
        if let Some(user) = list.auth.current_user() {
            list.subscribe(&user);
        }
        list
    }

    pub fn user(&self) -> Option<UserId> {
        self.auth.current_user()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.view.tasks
    }

    pub fn view(&self) -> &TaskList {
        &self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sign_in(&mut self, name: &str) -> Result<UserId, AuthError> {
        let user = self.auth.sign_in(name)?;
        info!(user = %user, "signed in");
        self.view = TaskList::new();
        self.subscribe(&user);
        Ok(user)
    }

    /// End the session, drop the feed, and clear the view
    pub fn sign_out(&mut self) {
        if let Err(e) = self.auth.sign_out() {
            error!(error = %e, "sign-out failed");
            return;
        }
        info!("signed out");
        self.subscription = None;
        self.view = TaskList::new();
    }

    fn subscribe(&mut self, user: &UserId) {
        match self.store.subscribe(user) {
            Ok(sub) => self.subscription = Some(sub),
            Err(e) => {
                error!(user = %user, error = %e, "subscribe failed");
                self.subscription = None;
            }
        }
    }

    /// Apply the newest queued snapshot, if any. Returns whether the view
    /// was replaced.
    pub fn refresh(&mut self) -> bool {
        let Some(snapshot) = self.subscription.as_ref().and_then(Subscription::poll) else {
            return false;
        };
        debug!(records = snapshot.len(), "snapshot applied");
        self.view = snapshot_to_list(snapshot);
        true
    }

    fn signed_in(&self, action: &str) -> Option<UserId> {
        let user = self.auth.current_user();
        if user.is_none() {
            warn!(action, "ignored: not signed in");
        }
        user
    }

    pub fn dispatch(&mut self, command: &Command) {
        match command {
            Command::Add(text) => self.add(text),
            Command::StartEdit(id) => self.start_edit(id),
            Command::SaveEdit(id, text) => self.save_edit(id, text),
            Command::CancelEdit(id) => self.cancel_edit(id),
            Command::Delete(id) => self.delete(id),
        }
    }

    pub fn add(&mut self, raw: &str) {
        let Some(text) = clean_text(raw) else {
            return;
        };
        let Some(user) = self.signed_in("add") else {
            return;
        };
        match self.store.create(&user, text) {
            Ok(id) => debug!(%id, "create requested"),
            Err(e) => error!(error = %e, "create failed"),
        }
    }

    pub fn start_edit(&mut self, id: &TaskId) {
        if self.signed_in("start-edit").is_some() {
            task_ops::start_edit(&mut self.view, id);
        }
    }

    pub fn cancel_edit(&mut self, id: &TaskId) {
        if self.signed_in("cancel-edit").is_some() {
            task_ops::cancel_edit(&mut self.view, id);
        }
    }

    pub fn save_edit(&mut self, id: &TaskId, raw: &str) {
        let Some(text) = clean_text(raw) else {
            return;
        };
        let Some(user) = self.signed_in("save-edit") else {
            return;
        };
        match self.store.update(&user, id, text) {
            Ok(()) => {
                // New text arrives with the next snapshot
                task_ops::cancel_edit(&mut self.view, id);
            }
            Err(e) => error!(%id, error = %e, "update failed"),
        }
    }

    pub fn delete(&mut self, id: &TaskId) {
        let Some(user) = self.signed_in("delete") else {
            return;
        };
        if let Err(e) = self.store.delete(&user, id) {
            error!(%id, error = %e, "delete failed");
        }
    }
}
