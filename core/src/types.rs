//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the remote service's JSON schema but are defined
//! independently from the mock-server crate; integration tests catch drift.
//! `Todo` keeps any field it does not model in `extra`, so the object sent
//! back on toggle is exactly the one the server produced.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier. The client never mints one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TodoId)
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Server fields this client does not interpret (timestamps etc.).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Todo {
    /// The same todo with `completed` inverted; every other field is kept.
    pub fn toggled(&self) -> Todo {
        Todo {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Request payload for creating a new todo. `completed` is left to the
/// server default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
}

impl From<&Draft> for CreateTodo {
    fn from(draft: &Draft) -> Self {
        CreateTodo {
            title: draft.title.clone(),
            description: draft.description.clone(),
        }
    }
}

/// An in-progress, not-yet-submitted todo. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

impl Draft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// A draft whose title is empty after trimming cannot be submitted.
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Apply a partial edit; fields left as `None` keep their value.
    pub fn merged(&self, edit: DraftEdit) -> Draft {
        Draft {
            title: edit.title.unwrap_or_else(|| self.title.clone()),
            description: edit.description.unwrap_or_else(|| self.description.clone()),
        }
    }
}

/// A partial change to the draft, as emitted by an input field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DraftEdit {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: Some(description.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_keeps_unknown_fields() {
        let raw = r#"{"id":7,"title":"A","description":null,"completed":false,"createdAt":"2024-01-01T00:00:00"}"#;
        let todo: Todo = serde_json::from_str(raw).unwrap();
        assert_eq!(todo.id, TodoId(7));
        assert_eq!(todo.extra["createdAt"], "2024-01-01T00:00:00");

        let back = serde_json::to_value(todo.toggled()).unwrap();
        assert_eq!(back["completed"], true);
        assert_eq!(back["createdAt"], "2024-01-01T00:00:00");
    }

    #[test]
    fn todo_defaults_missing_completed_and_description() {
        let todo: Todo = serde_json::from_str(r#"{"id":1,"title":"Bare"}"#).unwrap();
        assert!(!todo.completed);
        assert!(todo.description.is_none());
    }

    #[test]
    fn create_payload_omits_completed() {
        let body = serde_json::to_value(CreateTodo::from(&Draft::new("Buy milk", "2%"))).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk", "description": "2%"}));
    }

    #[test]
    fn whitespace_title_is_not_submittable() {
        assert!(!Draft::new("   \t", "desc").is_submittable());
        assert!(!Draft::default().is_submittable());
        assert!(Draft::new(" x ", "").is_submittable());
    }

    #[test]
    fn draft_edit_touches_only_given_fields() {
        let draft = Draft::new("a", "b");
        assert_eq!(draft.merged(DraftEdit::title("c")), Draft::new("c", "b"));
        assert_eq!(draft.merged(DraftEdit::description("d")), Draft::new("a", "d"));
        assert_eq!(draft.merged(DraftEdit::default()), draft);
    }

    #[test]
    fn todo_id_parses_from_text() {
        assert_eq!(" 42 ".parse::<TodoId>().unwrap(), TodoId(42));
        assert!("abc".parse::<TodoId>().is_err());
    }
}
