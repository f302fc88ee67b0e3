//! Messages exchanged between the presentation layer and the sync engine.

use crate::http::HttpRequest;
use crate::state::Theme;
use crate::types::{Draft, DraftEdit, TodoId};

/// Everything a user (or the mount lifecycle) can ask of the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The list was mounted; load the collection once.
    Mounted,
    CreateRequested(Draft),
    ToggleRequested(TodoId),
    DeleteRequested(TodoId),
    ThemeToggleRequested,
    DraftChanged(DraftEdit),
}

/// The remote call a request belongs to. Travels with the request so the
/// response can be reconciled without any per-request bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Toggle(TodoId),
    Delete(TodoId),
}

/// How a successful response is folded into local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Replace the collection with the response body.
    Replace,
    /// Append the returned todo and clear the draft.
    Append,
    /// Ignore the body and reload the collection.
    Refetch,
}

impl Operation {
    /// The reconcile policy table.
    pub fn reconcile(self) -> Reconcile {
        match self {
            Operation::List => Reconcile::Replace,
            Operation::Create => Reconcile::Append,
            Operation::Toggle(_) | Operation::Delete(_) => Reconcile::Refetch,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Toggle(_) => "toggle",
            Operation::Delete(_) => "delete",
        }
    }

    pub fn id(self) -> Option<TodoId> {
        match self {
            Operation::Toggle(id) | Operation::Delete(id) => Some(id),
            Operation::List | Operation::Create => None,
        }
    }
}

/// A request the host must execute, tagged with its operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub operation: Operation,
    pub request: HttpRequest,
}

/// Work the engine hands back to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(Command),
    /// Set or clear the host's global colour-scheme attribute.
    ApplyTheme(Theme),
}

impl Effect {
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Effect::Request(command) => Some(command),
            Effect::ApplyTheme(_) => None,
        }
    }
}
