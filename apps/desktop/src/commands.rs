//! Line commands typed at the prompt.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    Ask(String),
    Reset,
    Status,
    Retry,
    Help,
    Quit,
    Nothing,
}

pub const HELP: &str = "\
commands:
  /upload <path>  upload a PDF and make it the current document
  /reset          forget the current document and conversation
  /status         show document and backend status
  /retry          check the backend connection again
  /help           show this help
  /quit           exit
anything else is sent as a question about the current document";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Ask(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "upload" | "u" if arg.is_empty() => Err("usage: /upload <path>".to_string()),
        "upload" | "u" => Ok(Command::Upload(PathBuf::from(arg))),
        "reset" => Ok(Command::Reset),
        "status" => Ok(Command::Status),
        "retry" => Ok(Command::Retry),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command '/{other}'; try /help")),
    }
}
