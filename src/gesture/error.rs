//! Gesture translation error types

use thiserror::Error;

/// Result type for gesture operations
pub type Result<T> = std::result::Result<T, GestureError>;

/// Gesture command errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GestureError {
    /// Command token is not in the recognized set
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Argument token could not be read as a number
    #[error("{command}: invalid value {token:?} for argument <{name}>")]
    InvalidArgument {
        /// Command being parsed
        command: &'static str,
        /// Name of the argument slot
        name: &'static str,
        /// The offending token
        token: String,
    },

    /// Required argument was not supplied
    #[error("{command}: missing required argument <{name}>")]
    MissingArgument {
        /// Command being parsed
        command: &'static str,
        /// Name of the argument slot
        name: &'static str,
    },

    /// More arguments than the command accepts
    #[error("{command}: unexpected extra argument {token:?}")]
    UnexpectedArgument {
        /// Command being parsed
        command: &'static str,
        /// First surplus token
        token: String,
    },
}
