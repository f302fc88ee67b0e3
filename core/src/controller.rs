//! Async driver that pairs the sync engine with a real transport.
//!
//! # Design
//! The state lives in a `RefCell` and is only borrowed between awaits, never
//! across one. Two dispatches polled on the same thread therefore interleave
//! freely: each completed step is applied atomically and whichever response
//! lands last wins. Nothing is queued, deduplicated or cancelled.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::intent::{Command, Effect, Intent};
use crate::state::{Theme, TodoState};
use crate::sync::SyncEngine;

/// Executes one HTTP request. Implementations should report any received
/// status as `Ok` and reserve `Err` for requests that never got a response.
#[async_trait(?Send)]
pub trait Transport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

type ThemeListener = Box<dyn Fn(Theme)>;

/// One mounted todo list: state store, sync engine and transport.
pub struct TodoListController<T> {
    engine: SyncEngine,
    transport: T,
    state: RefCell<TodoState>,
    on_theme: Option<ThemeListener>,
}

impl<T: Transport> TodoListController<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            engine: SyncEngine::new(client),
            transport,
            state: RefCell::new(TodoState::new()),
            on_theme: None,
        }
    }

    /// Called with the new theme whenever the user flips it.
    pub fn on_theme_change(mut self, listener: impl Fn(Theme) + 'static) -> Self {
        self.on_theme = Some(Box::new(listener));
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A copy of the current state for rendering.
    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    /// Initial load.
    pub async fn mount(&self) {
        self.dispatch(Intent::Mounted).await;
    }

    /// Tear down, handing back the last state.
    pub fn unmount(self) -> TodoState {
        self.state.into_inner()
    }

    /// Run an intent to completion, including any follow-up refetch.
    /// Remote failures are absorbed by the engine; this never fails.
    pub async fn dispatch(&self, intent: Intent) {
        trace!(?intent, "dispatch");
        let effects = self.engine.handle(&mut self.state.borrow_mut(), intent);
        self.run(effects).await;
    }

    async fn run(&self, effects: Vec<Effect>) {
        let mut pending = VecDeque::from(effects);
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::ApplyTheme(theme) => {
                    if let Some(listener) = &self.on_theme {
                        listener(theme);
                    }
                }
                Effect::Request(Command { operation, request }) => {
                    debug!(operation = operation.name(), method = %request.method, path = %request.path, "sending");
                    let outcome = self.transport.execute(request).await;
                    let follow_up = self
                        .engine
                        .complete(&mut self.state.borrow_mut(), operation, outcome);
                    pending.extend(follow_up);
                }
            }
        }
    }
}
