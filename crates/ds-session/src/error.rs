//! Session error types.

use ds_core::JobId;
use thiserror::Error;

use crate::session::SessionState;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// A line from the simulator that could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("missing field '{field}' (position {position}) in '{line}'")]
    MissingField {
        line: String,
        field: &'static str,
        position: usize,
    },

    #[error("field '{field}' is not a valid integer: '{value}' in '{line}'")]
    InvalidInteger {
        line: String,
        field: &'static str,
        value: String,
    },

    #[error("expected {expected}, got '{line}'")]
    UnexpectedReply { expected: &'static str, line: String },
}

/// Errors that end a session. None of them is retried.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed by simulator while waiting for {expecting}")]
    ConnectionClosed { expecting: &'static str },

    #[error("simulator rejected '{request}': '{response}'")]
    Rejected { request: String, response: String },

    #[error("malformed message: {0}")]
    Malformed(#[from] ProtocolError),

    #[error("cannot {operation} in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("job {0} is not known to this session")]
    UnknownJob(JobId),

    #[error("no server at catalog position {0}")]
    UnknownServer(usize),
}
