//! Error types.

use thiserror::Error as ThisError;

use crate::middleware::{ActionKind, Field};

/// The error type returned by reroute's fallible infrastructure operations.
///
/// Application-level outcomes (404, 400 for a rejected mutation, etc.) are
/// expressed as HTTP [`Response`](crate::Response) values, not as `Error`s.
/// This type surfaces binding/accept failures and requests whose target URL
/// cannot be reconstructed.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why the request mutator refused to produce a directive.
///
/// Every variant is caller input gone wrong: the router answers it with
/// `400 Bad Request` and the error message as the body.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MutationError {
    #[error("must set {} to {}", action.requirement(), action.describe())]
    InvalidInput { action: ActionKind, missing_field: Field },

    #[error("unrecognized action received in middleware: {action}")]
    UnrecognizedAction { action: String },

    #[error("`{name}` cannot be used as an HTTP header with the given value")]
    InvalidHeader { name: String },
}
