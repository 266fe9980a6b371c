use std::path::PathBuf;

use thiserror::Error;

use crate::domain::RecordId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Classify(String),
    Paste,
    History,
    Show(RecordId),
    Delete(RecordId),
    Clear,
    Export(Option<PathBuf>),
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a valid history id")]
    InvalidId(String),
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        // Validation of the text itself belongs to the workflow.
        "classify" | "c" => Command::Classify(rest.to_string()),
        "paste" | "p" => Command::Paste,
        "history" | "ls" => Command::History,
        "show" => Command::Show(parse_id("show", rest)?),
        "delete" | "rm" => Command::Delete(parse_id("delete", rest)?),
        "clear" => Command::Clear,
        "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "reload" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_id(command: &'static str, raw: &str) -> Result<RecordId, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    raw.parse::<RecordId>()
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}
