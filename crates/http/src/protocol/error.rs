use std::io;
use thiserror::Error;

/// Errors produced while parsing a request head.
///
/// Every variant except [`ParseError::Io`] is fatal to the request being parsed:
/// the state machine moves to [`ParseState::Error`](crate::protocol::ParseState::Error)
/// and the connection should be dropped.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("invalid request line: {reason}")]
    InvalidRequestLine { reason: String },

    #[error("unsupported http version: {version:?}")]
    UnsupportedHttpVersion { version: String },

    #[error("error request state")]
    InvalidState,

    #[error("stream ended before the request head was complete")]
    UnexpectedEof,

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("request head is incomplete")]
    IncompleteRequest,

    #[error("invalid http uri")]
    InvalidUri,

    #[error("can't build http request: {source}")]
    InvalidHttpRequest {
        #[from]
        source: http::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_header<S: ToString>(str: S) -> Self {
        Self::MalformedHeader { reason: str.to_string() }
    }

    pub fn invalid_request_line<S: ToString>(str: S) -> Self {
        Self::InvalidRequestLine { reason: str.to_string() }
    }

    pub fn unsupported_version<S: ToString>(str: S) -> Self {
        Self::UnsupportedHttpVersion { version: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the error came from the byte source rather than from the bytes themselves.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
