use crate::model::task::{Task, TaskId, TaskList};

/// A user-issued command against a task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a task with this (untrimmed) text
    Add(String),
    /// Put one record into edit mode, taking every other record out of it
    StartEdit(TaskId),
    /// Replace a record's text and leave edit mode
    SaveEdit(TaskId, String),
    /// Leave edit mode without touching the text
    CancelEdit(TaskId),
    Delete(TaskId),
}

/// Apply a command to a list, producing the next list.
///
/// Invalid input (blank text, unknown id) yields the list unchanged.
pub fn apply(mut list: TaskList, command: &Command) -> TaskList {
    match command {
        Command::Add(text) => {
            add_task(&mut list, text);
        }
        Command::StartEdit(id) => {
            start_edit(&mut list, id);
        }
        Command::SaveEdit(id, text) => {
            save_edit(&mut list, id, text);
        }
        Command::CancelEdit(id) => {
            cancel_edit(&mut list, id);
        }
        Command::Delete(id) => {
            delete_task(&mut list, id);
        }
    }
    list
}

/// Trimmed text, or None if nothing is left
pub fn clean_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

// ---------------------------------------------------------------------------
// In-place operations
// ---------------------------------------------------------------------------

/// Append a new task. Returns the assigned id, or None for blank text.
pub fn add_task(list: &mut TaskList, raw: &str) -> Option<TaskId> {
    let text = clean_text(raw)?;
    let id = TaskId::new(list.next_id.to_string());
    list.next_id += 1;
    list.tasks.push(Task::new(id.clone(), text.to_string()));
    Some(id)
}

/// Enter edit mode on `id`. Returns false (and changes nothing) if the id
/// is not in the list.
pub fn start_edit(list: &mut TaskList, id: &TaskId) -> bool {
    if list.get(id).is_none() {
        return false;
    }
    for task in &mut list.tasks {
        task.editing = &task.id == id;
    }
    true
}

/// Store new text for `id` and leave edit mode. Blank text is ignored and
/// the record stays exactly as it was.
pub fn save_edit(list: &mut TaskList, id: &TaskId, raw: &str) -> bool {
    let Some(text) = clean_text(raw) else {
        return false;
    };
    match list.tasks.iter_mut().find(|t| &t.id == id) {
        Some(task) => {
            task.text = text.to_string();
            task.editing = false;
            true
        }
        None => false,
    }
}

pub fn cancel_edit(list: &mut TaskList, id: &TaskId) -> bool {
    match list.tasks.iter_mut().find(|t| &t.id == id) {
        Some(task) => {
            let was_editing = task.editing;
            task.editing = false;
            was_editing
        }
        None => false,
    }
}

pub fn delete_task(list: &mut TaskList, id: &TaskId) -> bool {
    let before = list.tasks.len();
    list.tasks.retain(|t| &t.id != id);
    list.tasks.len() != before
}
