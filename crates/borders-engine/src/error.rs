//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that `main` propagates.
//! Only startup failures end up here; persistence problems during a run
//! are logged by the coordinator and never abort the process.

use borders_types::ItemIdError;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: borders_core::ConfigError,
    },

    /// The configuration holds a value the engine cannot run with.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

/// A console line that could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    /// The first word is not a known verb.
    #[error("unknown command `{verb}`")]
    UnknownVerb {
        /// The word that was not recognized.
        verb: String,
    },

    /// A required argument is missing.
    #[error("`{verb}` expects {expected}")]
    MissingArgument {
        /// The verb being parsed.
        verb: String,
        /// What was expected.
        expected: &'static str,
    },

    /// An argument did not parse.
    #[error("invalid {what} `{raw}`: {reason}")]
    InvalidArgument {
        /// Argument kind.
        what: &'static str,
        /// The text supplied.
        raw: String,
        /// Why it did not parse.
        reason: String,
    },

    /// An item identifier did not parse.
    #[error("invalid item: {source}")]
    InvalidItem {
        /// The underlying identifier error.
        #[from]
        source: ItemIdError,
    },

    /// More arguments were given than the verb accepts.
    #[error("`{verb}` got unexpected argument `{extra}`")]
    TrailingArgument {
        /// The verb being parsed.
        verb: String,
        /// First unexpected argument.
        extra: String,
    },
}
