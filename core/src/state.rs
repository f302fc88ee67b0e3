//! In-memory state store observed by the presentation layer.
//!
//! # Design
//! Every mutation replaces a whole field value and bumps `revision`, so a
//! renderer never observes a half-applied step. Only the sync engine
//! mutates; hosts read through the accessors or take a cloned snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{Draft, Todo, TodoId};

/// Colour scheme selected by the user. Never derived from remote state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Counts shown under the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Summary {
    pub fn of(todos: &[Todo]) -> Summary {
        let completed = todos.iter().filter(|t| t.completed).count();
        Summary {
            total: todos.len(),
            completed,
            pending: todos.len() - completed,
        }
    }
}

/// Collection, draft, busy flag and theme of one mounted todo list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoState {
    todos: Vec<Todo>,
    draft: Draft,
    busy: bool,
    theme: Theme,
    revision: u64,
}

impl TodoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn todo(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// True while a create request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Incremented on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.todos)
    }

    pub(crate) fn replace_todos(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        self.bump();
    }

    /// Appends by building a new collection and swapping it in.
    pub(crate) fn append_todo(&mut self, todo: Todo) {
        let mut todos = Vec::with_capacity(self.todos.len() + 1);
        todos.extend(self.todos.iter().cloned());
        todos.push(todo);
        self.replace_todos(todos);
    }

    pub(crate) fn replace_draft(&mut self, draft: Draft) {
        self.draft = draft;
        self.bump();
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.bump();
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, completed: bool) -> Todo {
        Todo {
            id: TodoId(id),
            title: format!("todo {id}"),
            description: None,
            completed,
            extra: Default::default(),
        }
    }

    #[test]
    fn new_state_is_empty_light_and_idle() {
        let state = TodoState::new();
        assert!(state.todos().is_empty());
        assert_eq!(state.draft(), &Draft::default());
        assert!(!state.is_busy());
        assert_eq!(state.theme(), Theme::Light);
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn append_keeps_order_and_bumps_revision() {
        let mut state = TodoState::new();
        state.replace_todos(vec![todo(1, false)]);
        let before = state.revision();
        state.append_todo(todo(2, true));
        assert_eq!(
            state.todos().iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![TodoId(1), TodoId(2)]
        );
        assert_eq!(state.revision(), before + 1);
    }

    #[test]
    fn summary_counts_completed_and_pending() {
        let mut state = TodoState::new();
        state.replace_todos(vec![todo(1, true), todo(2, false), todo(3, false)]);
        assert_eq!(
            state.summary(),
            Summary {
                total: 3,
                completed: 1,
                pending: 2
            }
        );
    }

    #[test]
    fn theme_toggles_back() {
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert!(Theme::Light.toggled().is_dark());
    }

    #[test]
    fn snapshot_serializes_theme_lowercase() {
        let json = serde_json::to_value(TodoState::new()).unwrap();
        assert_eq!(json["theme"], "light");
        assert_eq!(json["busy"], false);
    }
}
