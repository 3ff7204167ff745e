use crate::model::task::{Task, TaskList};
use crate::ops::task_ops::{self, Command};
use crate::remote::{AuthError, AuthService, DocumentStore, SyncedTaskList, UserId};

/// What a front-end needs from a task list, whichever variant backs it
pub trait TaskBoard {
    fn tasks(&self) -> &[Task];
    fn dispatch(&mut self, command: Command);
    /// Pull in outside changes. Returns whether the tasks changed.
    fn refresh(&mut self) -> bool {
        false
    }
    /// Signed-in user; None for boards without identity
    fn user(&self) -> Option<UserId> {
        None
    }
    /// Whether this board needs a signed-in user to work
    fn needs_sign_in(&self) -> bool {
        false
    }
    fn sign_in(&mut self, _name: &str) -> Result<Option<UserId>, AuthError> {
        Ok(None)
    }
    fn sign_out(&mut self) {}
    /// Short label for the status row
    fn label(&self) -> String;
}

/// In-memory board; everything is gone when it is dropped
#[derive(Debug, Clone, Default)]
pub struct LocalBoard {
    list: TaskList,
}

impl LocalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }
}

impl TaskBoard for LocalBoard {
    fn tasks(&self) -> &[Task] {
        &self.list.tasks
    }

    fn dispatch(&mut self, command: Command) {
        let list = std::mem::take(&mut self.list);
        self.list = task_ops::apply(list, &command);
    }

    fn label(&self) -> String {
        "local".to_string()
    }
}

impl<S: DocumentStore, A: AuthService> TaskBoard for SyncedTaskList<S, A> {
    fn tasks(&self) -> &[Task] {
        SyncedTaskList::tasks(self)
    }

    fn dispatch(&mut self, command: Command) {
        SyncedTaskList::dispatch(self, &command);
    }

    fn refresh(&mut self) -> bool {
        SyncedTaskList::refresh(self)
    }

    fn user(&self) -> Option<UserId> {
        SyncedTaskList::user(self)
    }

    fn needs_sign_in(&self) -> bool {
        SyncedTaskList::user(self).is_none()
    }

    fn sign_in(&mut self, name: &str) -> Result<Option<UserId>, AuthError> {
        SyncedTaskList::sign_in(self, name).map(Some)
    }

    fn sign_out(&mut self) {
        SyncedTaskList::sign_out(self);
    }

    fn label(&self) -> String {
        match SyncedTaskList::user(self) {
            Some(user) => format!("synced as {}", user),
            None => "signed out".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MemoryAuth, MemoryStore};

    #[test]
    fn local_board_applies_commands() {
        let mut board = LocalBoard::new();
        board.dispatch(Command::Add("one".into()));
        board.dispatch(Command::Add("two".into()));
        let id = board.tasks()[1].id.clone();
        board.dispatch(Command::StartEdit(id.clone()));
        board.dispatch(Command::SaveEdit(id, "two!".into()));
        assert_eq!(board.tasks()[1].text, "two!");
        assert!(!board.needs_sign_in());
        assert!(!board.refresh());
        assert_eq!(board.label(), "local");
    }

    #[test]
    fn synced_board_through_trait_object() {
        let mut board: Box<dyn TaskBoard> =
            Box::new(SyncedTaskList::new(MemoryStore::new(), MemoryAuth::new()));
        assert!(board.needs_sign_in());
        assert_eq!(board.label(), "signed out");

        board.sign_in("ana").unwrap();
        assert!(!board.needs_sign_in());
        board.dispatch(Command::Add("hello".into()));
        assert!(board.refresh());
        assert_eq!(board.tasks()[0].text, "hello");
        assert_eq!(board.label(), "synced as ana");

        board.sign_out();
        assert!(board.tasks().is_empty());
        assert!(board.needs_sign_in());
    }
}
