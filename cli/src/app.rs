//! Wires config, transport, controller and renderer together.
//!
//! The prompt keeps reading while requests are in flight: every line's
//! intents run in their own local task, and the list is printed again when
//! that task finishes. Leaving the prompt waits for those tasks.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use anyhow::Context as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::{JoinSet, LocalSet};
use todo_core::{Draft, Intent, TodoClient, TodoId, TodoListController};
use tracing::{debug, info, warn};

use crate::config::{Command, Config};
use crate::input::{parse_line, Action, HELP};
use crate::render::{render, Palette};
use crate::transport::ReqwestTransport;

pub type Controller = TodoListController<ReqwestTransport>;

pub fn controller(config: &Config) -> Controller {
    TodoListController::new(TodoClient::new(&config.base_url), ReqwestTransport::new())
        .on_theme_change(|theme| info!(?theme, "colour scheme applied"))
}

fn write_state<W: Write>(out: &mut W, controller: &Controller, plain: bool) -> std::io::Result<()> {
    let state = controller.snapshot();
    let palette = if plain {
        Palette::plain()
    } else {
        Palette::for_theme(state.theme())
    };
    write!(out, "{}", render(&state, palette))?;
    out.flush()
}

/// The intent a one-shot subcommand raises, if any.
pub fn command_intent(command: Command) -> Option<Intent> {
    match command {
        Command::List => None,
        Command::Add { title, description } => Some(Intent::CreateRequested(Draft::new(title, description))),
        Command::Toggle { id } => Some(Intent::ToggleRequested(TodoId(id))),
        Command::Delete { id } => Some(Intent::DeleteRequested(TodoId(id))),
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let controller = Rc::new(controller(&config));
    info!(base_url = %config.base_url, "mounting");
    controller.mount().await;

    match config.command.clone() {
        Some(command) => {
            if let Some(intent) = command_intent(command) {
                controller.dispatch(intent).await;
            }
            write_state(&mut std::io::stdout().lock(), &controller, config.no_color).context("writing stdout")
        }
        None => {
            let input = BufReader::new(tokio::io::stdin());
            let out = Rc::new(RefCell::new(std::io::stdout()));
            prompt(controller, input, out, config.no_color).await
        }
    }
}

/// Reads commands from `input` until end of input or `quit`, printing the
/// list to `out` after each one. Returns once every accepted command has
/// finished, so piped sessions never lose a mutation.
pub async fn prompt<R, W>(controller: Rc<Controller>, input: R, out: Rc<RefCell<W>>, plain: bool) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + 'static,
{
    LocalSet::new().run_until(prompt_loop(controller, input, out, plain)).await
}

async fn prompt_loop<R, W>(controller: Rc<Controller>, input: R, out: Rc<RefCell<W>>, plain: bool) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + 'static,
{
    {
        let mut out = out.borrow_mut();
        write_state(&mut *out, &controller, plain).context("writing output")?;
        writeln!(out, "{HELP}").context("writing output")?;
    }

    let mut tasks = JoinSet::new();
    let mut lines = input.lines();
    loop {
        {
            let mut out = out.borrow_mut();
            write!(out, "> ").context("writing output")?;
            out.flush().context("writing output")?;
        }

        let Some(line) = lines.next_line().await.context("reading input")? else {
            break;
        };
        let action = match parse_line(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out.borrow_mut(), "{err}").context("writing output")?;
                continue;
            }
        };
        match action {
            Action::Quit => break,
            Action::Help => writeln!(out.borrow_mut(), "{HELP}").context("writing output")?,
            Action::Show => write_state(&mut *out.borrow_mut(), &controller, plain).context("writing output")?,
            action => {
                let intents = action.intents(&controller.snapshot());
                let controller = Rc::clone(&controller);
                let out = Rc::clone(&out);
                tasks.spawn_local(async move {
                    for intent in intents {
                        controller.dispatch(intent).await;
                    }
                    if let Err(err) = write_state(&mut *out.borrow_mut(), &controller, plain) {
                        warn!(error = %err, "could not print the list");
                    }
                });
            }
        }
    }

    if !tasks.is_empty() {
        debug!(pending = tasks.len(), "waiting for in-flight commands");
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "command task failed");
        }
    }
    Ok(())
}
