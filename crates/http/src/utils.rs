//! Utility macros and functions for the parser crate.
//!
//! This module provides helper macros and functions that are used internally
//! by the request-line and header parsers.

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's useful for validation checks where you want to return early with an error
/// if some condition is not satisfied.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(name.is_empty(), ParseError::malformed_header("empty field name"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// The line terminator for the request-line and every header line.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Returns the index of the first CRLF in `src`, if any.
#[inline]
pub(crate) fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(CRLF.len()).position(|window| window == CRLF)
}

/// Trims leading and trailing plain space characters (0x20).
///
/// Tabs and other whitespace are left in place.
#[inline]
pub(crate) fn trim_spaces(mut bytes: &[u8]) -> &[u8] {
    while let [b' ', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' '] = bytes {
        bytes = rest;
    }
    bytes
}
