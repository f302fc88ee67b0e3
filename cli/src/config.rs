//! Command-line and environment configuration.

use clap::{Parser, Subcommand};
use todo_core::DEFAULT_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(name = "todo")]
#[command(about = "Terminal client for a todo REST service")]
#[command(version)]
pub struct Config {
    /// Base URL of the todo service (the client appends /api/todos)
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "TODO_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print without ANSI colours
    #[arg(long)]
    pub no_color: bool,

    /// Run one action and exit instead of starting the prompt.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the list
    List,
    /// Create a todo
    Add {
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// Flip completed on a todo
    Toggle { id: i64 },
    /// Delete a todo
    Delete { id: i64 },
}
