//! Parsing of the interactive command line.

use thiserror::Error;

pub const HELP: &str = "\
commands:
  add <title>    add a todo
  toggle <n>     flip row n between done and not done
  rm <n>         delete row n
  reload         fetch the list again
  help           show this text
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Title exactly as typed after the keyword.
    Add(String),
    Toggle(usize),
    Remove(usize),
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs a row number")]
    MissingRow(&'static str),
    #[error("`{0}` is not a row number")]
    BadRow(String),
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.trim().is_empty() {
            return Ok(None);
        }
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };
        let command = match word {
            "add" | "a" => Command::Add(rest.to_string()),
            "toggle" | "t" => Command::Toggle(row(rest, "toggle")?),
            "rm" | "remove" | "delete" => Command::Remove(row(rest, "rm")?),
            "reload" | "r" => Command::Reload,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Rows are shown numbered from 1.
fn row(arg: &str, command: &'static str) -> Result<usize, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::MissingRow(command));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadRow(arg.to_string())),
    }
}
