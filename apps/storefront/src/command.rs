use std::str::FromStr;
use thiserror::Error;

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raw filter text; acceptance happens in the view pipeline
    Filter(String),
    NextPage,
    PreviousPage,
    /// 1-based row on the current page
    Select(usize),
    Favourite(usize),
    Refresh,
    Back,
    /// Navigate to a route path, e.g. `/products/3`
    Go(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'h' for help")]
    Unknown(String),

    #[error("'{0}' needs a row number, e.g. '{0} 1'")]
    MissingRow(String),

    #[error("'{0}' is not a row number")]
    InvalidRow(String),

    #[error("'g' needs a path, e.g. 'g /products/1'")]
    MissingPath,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if let Some(text) = line.strip_prefix('/') {
            return Ok(Command::Filter(text.to_string()));
        }

        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        let arg = parts.next();

        match verb {
            "n" | "next" => Ok(Command::NextPage),
            "p" | "prev" => Ok(Command::PreviousPage),
            "s" | "select" => parse_row(verb, arg).map(Command::Select),
            "f" | "fav" => parse_row(verb, arg).map(Command::Favourite),
            "r" | "refresh" => Ok(Command::Refresh),
            "b" | "back" => Ok(Command::Back),
            "g" | "go" => arg
                .map(|path| Command::Go(path.to_string()))
                .ok_or(CommandError::MissingPath),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

fn parse_row(verb: &str, arg: Option<&str>) -> Result<usize, CommandError> {
    let raw = arg.ok_or_else(|| CommandError::MissingRow(verb.to_string()))?;
    match raw.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(CommandError::InvalidRow(raw.to_string())),
    }
}
