//! Command-line configuration
//!
//! Usage:
//!   estree-eval [eval]   - Evaluate the ESTree JSON read from stdin
//!   estree-eval parse    - Print the parsed tree read from stdin
//!   estree-eval repl     - One JSON program per line, state kept between lines
//!   estree-eval help     - Show help message

use thiserror::Error;

/// Exit status when input cannot be read or parsed
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for bad arguments or absent input
pub const EXIT_USAGE: i32 = 2;

/// What the binary was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Eval,
    Parse,
    Repl,
    Help,
    Version,
}

/// Bad command-line arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

impl Command {
    /// Parse arguments, not including the program name
    pub fn from_args<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let command = match args.next() {
            None => return Ok(Command::Eval),
            Some(arg) => match arg.as_ref() {
                "eval" => Command::Eval,
                "parse" => Command::Parse,
                "repl" => Command::Repl,
                "help" | "--help" | "-h" => Command::Help,
                "version" | "--version" | "-V" => Command::Version,
                other => return Err(UsageError::UnknownCommand(other.to_string())),
            },
        };

        match args.next() {
            Some(extra) => Err(UsageError::UnexpectedArgument(extra.as_ref().to_string())),
            None => Ok(command),
        }
    }
}

/// True when stdin carried nothing to parse
pub fn is_absent_input(input: &str) -> bool {
    input.trim().is_empty()
}
