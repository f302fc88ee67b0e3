//! Client core for a single-page todo list backed by a REST service.
//!
//! # Overview
//! The state store (`TodoState`) holds the cached collection, the draft, the
//! busy flag and the theme. The sync engine (`SyncEngine`) turns user intents
//! into HTTP requests and folds responses back into the store. Both are
//! sans-IO: requests and responses are plain data, and whoever hosts the
//! engine executes the round-trip.
//!
//! # Design
//! - `TodoClient` is stateless and splits every call into `build_*` and
//!   `parse_*`, so the I/O boundary is explicit.
//! - Toggle and delete always reload the collection after success; create
//!   appends the server's response. See `Operation::reconcile`.
//! - `TodoListController` drives the engine over any async `Transport`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod intent;
pub mod state;
pub mod sync;
pub mod types;

pub use client::{TodoClient, COLLECTION_PATH, DEFAULT_BASE_URL};
pub use controller::{TodoListController, Transport};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use intent::{Command, Effect, Intent, Operation, Reconcile};
pub use state::{Summary, Theme, TodoState};
pub use sync::SyncEngine;
pub use types::{CreateTodo, Draft, DraftEdit, Todo, TodoId};
