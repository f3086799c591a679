//! Line-oriented front end: reads commands, drives the session, re-renders.

use client_core::{CommentSession, SessionError};
use shared::{
    domain::{CommentId, FormField},
    error::ValidationError,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::render::{render_comments, render_form};

const PROMPT: &str = "> ";

const HELP: &str = "\
commands:
  list                       show the comments list
  edit <id>                  load a listed comment into the form
  set <name|email|body> <v>  set a form field
  form                       show the form
  submit                     add or update the comment held by the form
  clear                      reset the form to a new comment
  delete <id>                delete a comment
  reload                     fetch the first page again
  help                       show this text
  quit                       leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Edit(CommentId),
    Set(FormField, String),
    Form,
    Submit,
    Clear,
    Delete(CommentId),
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid comment id '{0}'")]
    InvalidId(String),
    #[error(transparent)]
    Field(#[from] ValidationError),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ShellParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "edit" => ShellCommand::Edit(parse_id(rest, "edit <id>")?),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim_start()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(ShellParseError::Usage("set <name|email|body> <value>"));
            }
            ShellCommand::Set(field.parse()?, value.to_string())
        }
        "form" => ShellCommand::Form,
        "submit" | "save" => ShellCommand::Submit,
        "clear" | "new" => ShellCommand::Clear,
        "delete" | "rm" => ShellCommand::Delete(parse_id(rest, "delete <id>")?),
        "reload" => ShellCommand::Reload,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ShellParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str, usage: &'static str) -> Result<CommentId, ShellParseError> {
    if raw.is_empty() {
        return Err(ShellParseError::Usage(usage));
    }
    match raw.parse::<CommentId>() {
        Ok(id) if !id.is_new() => Ok(id),
        _ => Err(ShellParseError::InvalidId(raw.to_string())),
    }
}

/// Runs commands from `input` until it ends or `quit` is read. The session is
/// expected to be initialized already.
pub async fn run_shell<R, W>(
    session: &CommentSession,
    limit: usize,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let intro = format!(
        "{}{}",
        render_comments(&session.comments().await),
        render_form(&session.form().await)
    );
    output.write_all(intro.as_bytes()).await?;
    output.write_all(PROMPT.as_bytes()).await?;
    output.flush().await?;

    let mut lines = input.split(b'\n');
    while let Some(raw) = lines.next_segment().await? {
        // Undecodable bytes become U+FFFD so one bad line does not end the session.
        let line = String::from_utf8_lossy(&raw);
        let text = match parse_command(line.trim_end_matches('\r')) {
            Ok(None) => String::new(),
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => execute(session, limit, command).await,
            Err(err) => format!("error: {err}\n"),
        };
        output.write_all(text.as_bytes()).await?;
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
    }
    output.write_all(b"\n").await?;
    output.flush().await
}

/// Remote failures are already logged by the session, so only the unchanged
/// list is shown for them.
async fn execute(session: &CommentSession, limit: usize, command: ShellCommand) -> String {
    match command {
        ShellCommand::List => render_comments(&session.comments().await),
        ShellCommand::Form => render_form(&session.form().await),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Edit(id) => match session.find_comment(id).await {
            Some(comment) => {
                session.begin_edit(&comment).await;
                render_form(&session.form().await)
            }
            None => format!("no comment #{id} in the list\n"),
        },
        ShellCommand::Set(field, value) => {
            session.set_form_field(field, value).await;
            render_form(&session.form().await)
        }
        ShellCommand::Clear => {
            session.clear_form().await;
            render_form(&session.form().await)
        }
        ShellCommand::Submit => {
            let note = match session.submit().await {
                Ok(saved) => format!("saved comment #{}\n", saved.id),
                Err(SessionError::Invalid(err)) => format!("error: {err}\n"),
                Err(SessionError::Remote(_)) => String::new(),
            };
            format!("{note}{}", render_comments(&session.comments().await))
        }
        ShellCommand::Delete(id) => {
            let _ = session.delete(id).await;
            render_comments(&session.comments().await)
        }
        ShellCommand::Reload => {
            let _ = session.initialize(limit).await;
            render_comments(&session.comments().await)
        }
        ShellCommand::Quit => String::new(),
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
