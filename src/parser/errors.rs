//! Parser error types.
//!
//! Declaration mistakes (duplicate tokens, duplicate subcommands) surface as
//! [`ConfigurationError`] when the argument is added, so a bad declaration
//! never survives into parsing. Everything raised while consuming user input
//! is a [`ParseError`].

use std::fmt;

use thiserror::Error;

/// Rejected argument or subcommand declaration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The token is already claimed by an existing flag or alias.
    #[error("Duplicate flag/alias: {0}")]
    DuplicateFlag(String),
    /// A positional with this name already exists.
    #[error("Duplicate argument name: {0}")]
    DuplicateArgument(String),
    #[error("Subcommand '{0}' already exists.")]
    DuplicateSubcommand(String),
}

/// Failure while parsing a token list.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The parser has subcommands and the first token matched none of them.
    #[error("A subcommand is required. Use --help for usage information.")]
    SubcommandRequired,
    /// A token that is neither a declared flag nor consumable as a positional.
    #[error("Unrecognized argument: {0}")]
    UnrecognizedArgument(String),
    /// A value token failed its declared type conversion.
    #[error("Invalid value '{value}' for '{name}': {message}")]
    InvalidValue {
        name: String,
        value: String,
        message: String,
    },
    #[error(transparent)]
    ArgumentRequired(#[from] ArgumentRequiredError),
}

/// A required argument was not satisfied.
///
/// Kept as its own type so callers can distinguish "you forgot something"
/// from the other parse failures without string matching.
#[derive(Debug, PartialEq, Eq)]
pub enum ArgumentRequiredError {
    /// Required positionals left unfilled, in declaration order.
    MissingArguments(Vec<String>),
    /// A value-taking flag was the last token. Carries the token as typed,
    /// alias spelling included.
    FlagRequiresValue(String),
}

impl fmt::Display for ArgumentRequiredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentRequiredError::MissingArguments(names) => {
                let plural = if names.len() == 1 { "" } else { "s" };
                write!(
                    f,
                    "Missing required argument{}: {}",
                    plural,
                    names.join(" ")
                )
            }
            ArgumentRequiredError::FlagRequiresValue(token) => {
                write!(f, "Flag {token} requires a value")
            }
        }
    }
}

impl std::error::Error for ArgumentRequiredError {}
