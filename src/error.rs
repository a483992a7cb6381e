//! Error types for model commands.

use thiserror::Error;

pub type CommandResult<T> = Result<T, CommandError>;

/// Reasons a mutation request is rejected. The model is untouched when any
/// of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("no body named {0:?}")]
    UnknownBody(String),

    #[error("{0} does not orbit; it has no speed to scale")]
    Stationary(String),

    #[error("speed multiplier {value} for {body} is outside {min}..={max}")]
    MultiplierOutOfRange {
        body: String,
        value: f32,
        min: f32,
        max: f32,
    },
}
