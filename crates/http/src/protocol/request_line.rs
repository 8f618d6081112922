//! Parsing of the request-line, `METHOD SP REQUEST-TARGET SP HTTP/1.1 CRLF`.

use std::str::Utf8Error;

use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;
use crate::utils::{CRLF, find_crlf};

const VERSION_PREFIX: &[u8] = b"HTTP/";
const SUPPORTED_VERSION: &str = "1.1";

/// The first line of a request.
///
/// The target is kept exactly as received; it is neither decoded nor validated, and may hold
/// bytes that are not UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: Vec<u8>,
    version: String,
}

impl RequestLine {
    /// Parses the request-line at the front of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` if `src` holds no CRLF yet
    /// - `Ok(Some((line, n)))` where `n` is the line length plus the CRLF
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidRequestLine`] if the line is not exactly three non-empty tokens
    ///   separated by single spaces, or the method has anything but `A`-`Z`
    /// - [`ParseError::UnsupportedHttpVersion`] if the version token is not `HTTP/1.1`
    pub fn parse(src: &[u8]) -> Result<Option<(Self, usize)>, ParseError> {
        let Some(line_end) = find_crlf(src) else {
            return Ok(None);
        };

        let segments: Vec<&[u8]> = src[..line_end].split(|b| *b == b' ').collect();
        let [method, target, version] = segments[..] else {
            return Err(ParseError::invalid_request_line(format!("expected 3 segments, found {}", segments.len())));
        };

        ensure!(
            !method.is_empty() && !target.is_empty() && !version.is_empty(),
            ParseError::invalid_request_line("empty segment")
        );
        ensure!(
            method.iter().all(u8::is_ascii_uppercase),
            ParseError::invalid_request_line(format!("invalid method {:?}", String::from_utf8_lossy(method)))
        );
        ensure!(
            version.strip_prefix(VERSION_PREFIX) == Some(SUPPORTED_VERSION.as_bytes()),
            ParseError::unsupported_version(String::from_utf8_lossy(version))
        );

        // the method is ascii upper-case only
        let method: String = method.iter().map(|b| char::from(*b)).collect();
        trace!(
            method,
            target = %String::from_utf8_lossy(target),
            consumed = line_end + CRLF.len(),
            "parsed request line"
        );

        let request_line = Self { method, target: target.to_vec(), version: SUPPORTED_VERSION.to_owned() };
        Ok(Some((request_line, line_end + CRLF.len())))
    }

    /// The request method, e.g. `GET`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request-target as text.
    ///
    /// # Errors
    ///
    /// Fails if the target is not valid UTF-8; [`RequestLine::target_bytes`] still has it.
    pub fn target(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.target)
    }

    /// The raw request-target.
    pub fn target_bytes(&self) -> &[u8] {
        &self.target
    }

    /// The HTTP version without the `HTTP/` prefix, always `1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }
}
