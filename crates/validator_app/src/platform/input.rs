use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use validator_core::{Msg, RequirementsFile};

use super::app::AppEvent;

pub const HELP: &str = "\
Commands:
  url <text>     set the repository URL (empty clears it)
  file <path>    choose a requirements file
  clear-file     forget the chosen file
  submit         send the form to the validator
  show           print the form again
  help           print this help
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Url(String),
    File(PathBuf),
    ClearFile,
    Submit,
    Show,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command {0:?}; type `help` for the list")]
    Unknown(String),
    #[error("`file` needs a path")]
    MissingPath,
}

/// Parses one stdin line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    // Only the command name is trimmed; `url` keeps its argument verbatim.
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match name {
        "url" => Command::Url(rest.to_string()),
        "file" if rest.trim().is_empty() => return Err(InputError::MissingPath),
        "file" => Command::File(PathBuf::from(rest.trim())),
        "clear-file" => Command::ClearFile,
        "submit" => Command::Submit,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Reads a requirements file into memory. Contents are not inspected.
pub fn load_requirements(path: &Path) -> anyhow::Result<RequirementsFile> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "requirements".to_string());
    Ok(RequirementsFile::new(name, bytes))
}

/// Turns a parsed command into a loop event, performing any file IO it needs.
pub fn command_event(command: Command) -> AppEvent {
    match command {
        Command::Url(url) => AppEvent::Dispatch(Msg::UrlChanged(url)),
        Command::File(path) => match load_requirements(&path) {
            Ok(file) => AppEvent::Dispatch(Msg::FileChosen(Some(file))),
            Err(err) => AppEvent::Notice(format!("{err:#}")),
        },
        Command::ClearFile => AppEvent::Dispatch(Msg::FileChosen(None)),
        Command::Submit => AppEvent::Dispatch(Msg::SubmitClicked),
        Command::Show => AppEvent::Show,
        Command::Help => AppEvent::Notice(HELP.to_string()),
        Command::Quit => AppEvent::Quit,
    }
}
