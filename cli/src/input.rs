//! Parses REPL lines into user actions.

use thiserror::Error;
use todo_core::{DraftEdit, Intent, TodoId, TodoState};

pub const HELP: &str = "\
commands:
  title <text>      set the draft title
  desc <text>       set the draft description
  add [title]       submit the draft (optionally setting its title first)
  toggle <id>       flip completed
  delete <id>       remove a todo
  theme             switch light/dark
  refresh           reload the list
  show              print the list
  help              this text
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EditTitle(String),
    EditDescription(String),
    Submit(Option<String>),
    Toggle(TodoId),
    Delete(TodoId),
    Theme,
    Refresh,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs a todo id")]
    MissingId(&'static str),
    #[error("`{0}` is not a todo id")]
    BadId(String),
}

pub fn parse_line(line: &str) -> Result<Option<Action>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let action = match word {
        "title" => Action::EditTitle(rest.to_string()),
        "desc" | "description" => Action::EditDescription(rest.to_string()),
        "add" => Action::Submit((!rest.is_empty()).then(|| rest.to_string())),
        "toggle" => Action::Toggle(parse_id("toggle", rest)?),
        "delete" | "rm" => Action::Delete(parse_id("delete", rest)?),
        "theme" => Action::Theme,
        "refresh" => Action::Refresh,
        "show" | "ls" => Action::Show,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(action))
}

fn parse_id(command: &'static str, rest: &str) -> Result<TodoId, InputError> {
    if rest.is_empty() {
        return Err(InputError::MissingId(command));
    }
    rest.trim_start_matches('#')
        .parse()
        .map_err(|_| InputError::BadId(rest.to_string()))
}

impl Action {
    /// The intents this action raises, given the current state. `Show`,
    /// `Help` and `Quit` raise none.
    pub fn intents(self, state: &TodoState) -> Vec<Intent> {
        match self {
            Action::EditTitle(title) => vec![Intent::DraftChanged(DraftEdit::title(title))],
            Action::EditDescription(desc) => vec![Intent::DraftChanged(DraftEdit::description(desc))],
            Action::Submit(None) => vec![Intent::CreateRequested(state.draft().clone())],
            Action::Submit(Some(title)) => {
                let draft = state.draft().merged(DraftEdit::title(title.clone()));
                vec![
                    Intent::DraftChanged(DraftEdit::title(title)),
                    Intent::CreateRequested(draft),
                ]
            }
            Action::Toggle(id) => vec![Intent::ToggleRequested(id)],
            Action::Delete(id) => vec![Intent::DeleteRequested(id)],
            Action::Theme => vec![Intent::ThemeToggleRequested],
            Action::Refresh => vec![Intent::Mounted],
            Action::Show | Action::Help | Action::Quit => Vec::new(),
        }
    }
}
