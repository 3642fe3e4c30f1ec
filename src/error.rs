//! Error types for the cab-rl crate

use thiserror::Error;

/// Main error type for the cab-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unknown exploration strategy '{input}'. Expected one of: {expected}")]
    UnknownStrategy { input: String, expected: String },

    #[error("decay rate required for exponential strategy")]
    MissingDecayRate,

    #[error("invalid action {action} (environment has {action_count} actions)")]
    InvalidAction { action: usize, action_count: usize },

    #[error("environment must be reset before it can be stepped or rendered")]
    NotReset,

    #[error("invalid layout: {message}")]
    InvalidLayout { message: String },

    #[error("location marker '{marker}' not found in layout")]
    MissingLocation { marker: char },

    #[error("location marker '{marker}' appears more than once in layout")]
    DuplicateLocation { marker: char },

    #[error("state {state} is out of range (state count is {state_count})")]
    StateOutOfRange { state: usize, state_count: usize },

    #[error(
        "Q-table shape {q_states}x{q_actions} does not match environment shape {env_states}x{env_actions}"
    )]
    DimensionMismatch {
        q_states: usize,
        q_actions: usize,
        env_states: usize,
        env_actions: usize,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn layout(message: impl Into<String>) -> Self {
        Error::InvalidLayout {
            message: message.into(),
        }
    }
}
