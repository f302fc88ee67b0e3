//! Text rendering of a `TodoState`.
//!
//! Pure: the same state always renders the same string. The theme picks
//! the ANSI palette; `Palette::plain` turns colour off for pipes and tests.

use std::fmt::Write;

use todo_core::{Theme, TodoState};

pub const EMPTY_MESSAGE: &str = "No todos yet. Create your first one!";

/// ANSI escape codes used by one colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub heading: &'static str,
    pub done: &'static str,
    pub open: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Palette {
        match theme {
            Theme::Light => Palette {
                heading: "\x1b[1;34m",
                done: "\x1b[32m",
                open: "\x1b[30m",
                muted: "\x1b[90m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Palette {
                heading: "\x1b[1;96m",
                done: "\x1b[92m",
                open: "\x1b[97m",
                muted: "\x1b[37m",
                reset: "\x1b[0m",
            },
        }
    }

    pub fn plain() -> Palette {
        Palette {
            heading: "",
            done: "",
            open: "",
            muted: "",
            reset: "",
        }
    }
}

fn theme_icon(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "☀️",
        Theme::Dark => "🌙",
    }
}

pub fn render(state: &TodoState, palette: Palette) -> String {
    let Palette {
        heading,
        done,
        open,
        muted,
        reset,
    } = palette;
    let mut out = String::new();

    let _ = writeln!(out, "{heading}Todo List{reset} {}", theme_icon(state.theme()));

    let draft = state.draft();
    let action = if state.is_busy() { "Adding..." } else { "Add Todo" };
    let _ = writeln!(
        out,
        "{muted}draft:{reset} {:?} / {:?}  [{action}]",
        draft.title, draft.description
    );
    out.push('\n');

    if state.todos().is_empty() {
        let _ = writeln!(out, "  {muted}{EMPTY_MESSAGE}{reset}");
    }
    for todo in state.todos() {
        let (mark, colour) = if todo.completed { ("x", done) } else { (" ", open) };
        let _ = writeln!(out, "  {colour}[{mark}] #{} {}{reset}", todo.id, todo.title);
        if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "        {muted}{description}{reset}");
        }
    }

    let summary = state.summary();
    let _ = writeln!(
        out,
        "\n{muted}Total{reset} {}  {muted}Completed{reset} {}  {muted}Pending{reset} {}",
        summary.total, summary.completed, summary.pending
    );
    out
}
