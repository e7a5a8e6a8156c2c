//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum HadqnError {
    /// A hyperparameter is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An action index is not in the action space.
    #[error("Action {action} is out of range for {n_actions} actions")]
    ActionOutOfRange {
        /// The given action index.
        action: usize,

        /// The number of actions of the environment.
        n_actions: usize,
    },

    /// A batch was requested from an empty replay buffer.
    #[error("Cannot sample from an empty replay buffer")]
    EmptyReplayBuffer,

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
