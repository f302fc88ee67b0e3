//! Terminal presentation layer for the todo list.
//!
//! Renders `TodoState` as text and turns prompt lines or subcommands into
//! intents for a `TodoListController` that talks HTTP through reqwest.

pub mod app;
pub mod config;
pub mod input;
pub mod render;
pub mod transport;

pub use app::run;
pub use config::Config;
pub use transport::ReqwestTransport;
