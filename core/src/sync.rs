//! Sans-IO sync engine between the state store and the remote collection.
//!
//! # Design
//! `handle` turns an intent into at most one request and `complete` folds a
//! response back in according to `Operation::reconcile`. Neither touches the
//! network, so any host (async controller, C caller, tests) drives the same
//! logic. Failures stop at this boundary: they are logged and the store is
//! left as it was.

use tracing::{debug, error, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::intent::{Command, Effect, Intent, Operation, Reconcile};
use crate::state::TodoState;
use crate::types::{CreateTodo, Draft};

#[derive(Debug, Clone)]
pub struct SyncEngine {
    client: TodoClient,
}

impl SyncEngine {
    pub fn new(client: TodoClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// Apply an intent to `state` and return the effects the host must run.
    pub fn handle(&self, state: &mut TodoState, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Mounted => vec![self.list_effect()],
            Intent::CreateRequested(draft) => self.create(state, &draft),
            Intent::ToggleRequested(id) => {
                let Some(todo) = state.todo(id) else {
                    warn!(%id, "toggle requested for a todo that is not loaded");
                    return Vec::new();
                };
                match self.client.build_update_todo(&todo.toggled()) {
                    Ok(request) => vec![Effect::Request(Command {
                        operation: Operation::Toggle(id),
                        request,
                    })],
                    Err(err) => {
                        error!(%id, error = %err, "could not encode toggle request");
                        Vec::new()
                    }
                }
            }
            Intent::DeleteRequested(id) => vec![Effect::Request(Command {
                operation: Operation::Delete(id),
                request: self.client.build_delete_todo(id),
            })],
            Intent::ThemeToggleRequested => {
                let theme = state.theme().toggled();
                state.set_theme(theme);
                vec![Effect::ApplyTheme(theme)]
            }
            Intent::DraftChanged(edit) => {
                let draft = state.draft().merged(edit);
                state.replace_draft(draft);
                Vec::new()
            }
        }
    }

    /// Fold the outcome of a request issued for `operation` into `state`.
    ///
    /// Returns follow-up effects: a single list request after a successful
    /// toggle or delete, nothing otherwise.
    pub fn complete(
        &self,
        state: &mut TodoState,
        operation: Operation,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Vec<Effect> {
        let effects = match outcome.and_then(|response| self.reconcile(state, operation, response)) {
            Ok(effects) => effects,
            Err(err) => {
                error!(operation = operation.name(), id = ?operation.id(), error = %err, "remote call failed");
                Vec::new()
            }
        };
        if operation == Operation::Create {
            state.set_busy(false);
        }
        effects
    }

    fn create(&self, state: &mut TodoState, draft: &Draft) -> Vec<Effect> {
        if state.is_busy() {
            debug!("create ignored while a previous create is in flight");
            return Vec::new();
        }
        if !draft.is_submittable() {
            debug!("create ignored for a draft with an empty title");
            return Vec::new();
        }
        let request = match self.client.build_create_todo(&CreateTodo::from(draft)) {
            Ok(request) => request,
            Err(err) => {
                error!(error = %err, "could not encode create request");
                return Vec::new();
            }
        };
        state.set_busy(true);
        vec![Effect::Request(Command {
            operation: Operation::Create,
            request,
        })]
    }

    fn reconcile(
        &self,
        state: &mut TodoState,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<Vec<Effect>, ApiError> {
        match operation.reconcile() {
            Reconcile::Replace => {
                let todos = self.client.parse_list_todos(response)?;
                debug!(count = todos.len(), "collection replaced");
                state.replace_todos(todos);
                Ok(Vec::new())
            }
            Reconcile::Append => {
                let todo = self.client.parse_create_todo(response)?;
                debug!(id = %todo.id, "created todo appended");
                state.append_todo(todo);
                state.replace_draft(Draft::default());
                Ok(Vec::new())
            }
            Reconcile::Refetch => {
                if let Operation::Delete(_) = operation {
                    self.client.parse_delete_todo(response)?;
                } else {
                    self.client.parse_update_todo(response)?;
                }
                Ok(vec![self.list_effect()])
            }
        }
    }

    fn list_effect(&self) -> Effect {
        Effect::Request(Command {
            operation: Operation::List,
            request: self.client.build_list_todos(),
        })
    }
}
