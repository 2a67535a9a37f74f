//! Interactive terminal session driving the [`ViewController`].

use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::AppError;
use crate::models::FormField;
use crate::storage::EntryStorage;
use crate::trigger::ActionTrigger;
use crate::view::{ViewController, render::render};

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add,
    Edit(String),
    Delete(String),
    Run(String),
    Toggle,
    List,
    Set(FormField, String),
    Save,
    Cancel,
    Dismiss,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an entry name or number")]
    MissingArgument(&'static str),
}

impl FromStr for ShellCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let selector = |command: &'static str| {
            if rest.is_empty() {
                Err(ParseCommandError::MissingArgument(command))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "add" | "new" => Ok(ShellCommand::Add),
            "edit" => selector("edit").map(ShellCommand::Edit),
            "delete" | "rm" => selector("delete").map(ShellCommand::Delete),
            "run" => selector("run").map(ShellCommand::Run),
            "toggle" => Ok(ShellCommand::Toggle),
            "list" | "ls" | "" => Ok(ShellCommand::List),
            "name" => Ok(ShellCommand::Set(FormField::Name, rest.to_string())),
            "key" => Ok(ShellCommand::Set(FormField::Key, rest.to_string())),
            "action" => Ok(ShellCommand::Set(FormField::Action, rest.to_string())),
            "save" => Ok(ShellCommand::Save),
            "cancel" => Ok(ShellCommand::Cancel),
            "dismiss" => Ok(ShellCommand::Dismiss),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// Applies one command. Failures have already been reported as notices.
pub fn dispatch<S, T>(
    controller: &mut ViewController<S, T>,
    command: ShellCommand,
) -> Result<(), AppError>
where
    S: EntryStorage,
    T: ActionTrigger,
{
    match command {
        ShellCommand::Add => controller.add(),
        ShellCommand::Edit(selector) => {
            let entry = controller.select(&selector)?;
            controller.edit(entry)
        }
        ShellCommand::Delete(selector) => {
            let entry = controller.select(&selector)?;
            controller.delete(entry).map(|_| ())
        }
        ShellCommand::Run(selector) => {
            let entry = controller.select(&selector)?;
            controller.run(&entry)
        }
        ShellCommand::Toggle => controller.toggle_row_actions().map(|_| ()),
        ShellCommand::List => {
            controller.refresh();
            Ok(())
        }
        ShellCommand::Set(field, value) => controller.set_field(field, value),
        ShellCommand::Save => controller.submit().map(|_| ()),
        ShellCommand::Cancel => controller.cancel(),
        ShellCommand::Dismiss => {
            controller.notifier().dismiss();
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    }
}

/// Runs the read-dispatch-render loop until `quit` or end of input.
pub async fn run_shell<S, T, R, W>(
    controller: &mut ViewController<S, T>,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    S: EntryStorage,
    T: ActionTrigger,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if controller.panel().is_none() {
        controller.initialize();
    }

    let mut lines = input.lines();
    loop {
        let screen = render(controller.model(), controller.notifier().current().as_ref());
        output.write_all(screen.as_bytes()).await?;
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(err) => {
                controller.notifier().warning(err.to_string());
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        if let Err(err) = dispatch(controller, command) {
            debug!(error = %err, "Shell command failed");
        }
    }

    output.write_all(b"\n").await?;
    output.flush().await
}
