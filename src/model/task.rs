use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque record identifier.
///
/// Local lists mint these from a counter; synced lists receive whatever
/// the document store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

/// A single to-do record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Always trimmed and non-empty
    pub text: String,
    /// Transient edit-mode flag (never persisted by a store)
    #[serde(default)]
    pub editing: bool,
}

impl Task {
    pub fn new(id: TaskId, text: String) -> Self {
        Task {
            id,
            text,
            editing: false,
        }
    }
}

/// Ordered collection of tasks.
///
/// `next_id` only grows, so ids freed by a delete are never handed out
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    #[serde(default = "first_id")]
    pub next_id: u64,
}

fn first_id() -> u64 {
    1
}

impl Default for TaskList {
    fn default() -> Self {
        TaskList {
            tasks: Vec::new(),
            next_id: first_id(),
        }
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from records whose ids were assigned elsewhere.
    /// Every record starts out of edit mode.
    pub fn from_records(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks = tasks
            .into_iter()
            .map(|mut t| {
                t.editing = false;
                t
            })
            .collect();
        TaskList {
            tasks,
            next_id: first_id(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// The record currently in edit mode, if any
    pub fn editing(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.editing)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}

/// "1 task total" / "3 tasks total"
pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 task total".to_string()
    } else {
        format!("{} tasks total", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_serializes_as_plain_string() {
        let task = Task::new(TaskId::new("abc"), "Buy milk".into());
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"id":"abc","text":"Buy milk","editing":false}"#);
    }

    #[test]
    fn editing_defaults_to_false_when_absent() {
        let task: Task = serde_json::from_str(r#"{"id":"7","text":"x"}"#).unwrap();
        assert!(!task.editing);
    }

    #[test]
    fn from_records_clears_edit_mode() {
        let mut a = Task::new("a".into(), "A".into());
        a.editing = true;
        let list = TaskList::from_records(vec![a, Task::new("b".into(), "B".into())]);
        assert!(list.editing().is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(count_label(1), "1 task total");
        assert_eq!(count_label(0), "0 tasks total");
        assert_eq!(count_label(4), "4 tasks total");
    }
}
