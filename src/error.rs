//! Chat game error types.
//!
//! Every error is raised synchronously while a header is rendered or a
//! configuration is assembled. Construction is pure, so none of them are
//! retryable: the same inputs fail the same way until the configuration is
//! fixed.

use thiserror::Error;

/// Chat game configuration and rendering errors.
#[derive(Error, Debug)]
pub enum GameError {
    /// Text input that is not a string was handed to the wrapping utility.
    #[error("Invalid input kind at line {index}: expected string, found {found}")]
    InvalidInputKind {
        /// Position of the offending line.
        index: usize,
        /// Kind of value that was found instead.
        found: String,
    },

    /// A declared slot has no value.
    #[error("Missing slot: {0}")]
    MissingSlot(String),

    /// A value was supplied for a slot the template does not declare.
    #[error("Unknown slot: {0}")]
    UnknownSlot(String),

    /// A slot value contains a character reserved by the message format.
    #[error("Unsafe value for slot {slot}: contains reserved character {ch:?}")]
    UnsafeValue {
        /// Slot that received the value.
        slot: String,
        /// The reserved character found in the value.
        ch: char,
    },

    /// Private information does not carry one value per player.
    #[error("Private info arity mismatch for {key}: expected {expected} values, found {found}")]
    PrivateInfoArity {
        /// Info key with the wrong number of values.
        key: String,
        /// Number of players.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },

    /// No payoff was supplied, so utility bounds are undefined.
    #[error("Empty payoff set: at least one payoff is required")]
    EmptyPayoffSet,

    /// Cross-field consistency failure while assembling a configuration.
    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    /// Malformed template or key catalog.
    #[error("Template error: {0}")]
    Template(String),

    /// Settings file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for chat game operations
pub type Result<T> = std::result::Result<T, GameError>;

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        GameError::Config(err.to_string())
    }
}

impl GameError {
    /// Shorthand for a [`GameError::ConfigValidation`] naming the violated rule.
    pub(crate) fn validation(rule: impl Into<String>) -> Self {
        GameError::ConfigValidation(rule.into())
    }
}
