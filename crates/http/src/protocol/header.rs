//! The header field collection of a request.
//!
//! [`Headers`] stores one value per lower-cased field name. Repeated fields are folded into
//! a single comma separated value in arrival order, so `Foo: A` followed by `foo: B` is
//! stored as `foo = "A,B"`.
//!
//! Field values are kept as the raw bytes received. [`Headers::get`] gives the value as text
//! when it is UTF-8, [`Headers::get_bytes`] gives it unchanged.
//!
//! Parsing happens one field-line per call to [`Headers::parse_one`]. A call never looks
//! past the first CRLF in the buffer, which lets the caller keep feeding the same buffer
//! until the blank line that terminates the header section shows up.

use std::collections::HashMap;
use std::collections::hash_map;

use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;
use crate::utils::{CRLF, find_crlf, trim_spaces};

/// Symbols allowed in a field name besides lower-case letters and digits.
const TOKEN_SPECIALS: &[u8] = b"!#$%&'*+-.^_`|~";

/// Header fields of a request, keyed by lower-case field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, Vec<u8>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one field-line from the front of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok((0, false))` if `src` holds no complete line yet
    /// - `Ok((2, true))` if `src` starts with the blank line that ends the header section
    /// - `Ok((n, false))` after storing one field, where `n` covers the line and its CRLF
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeader`] if the line has no colon, the field name is
    /// empty, the name is followed by whitespace before the colon, or the name contains a
    /// character outside the token set. The collection is left untouched on error.
    pub fn parse_one(&mut self, src: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(line_end) = find_crlf(src) else {
            return Ok((0, false));
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        let field_line = trim_spaces(&src[..line_end]);
        let colon = field_line
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| ParseError::malformed_header("missing colon separator"))?;

        let (name, value) = (&field_line[..colon], &field_line[colon + 1..]);
        ensure!(!name.is_empty(), ParseError::malformed_header("empty field name"));
        ensure!(!name.ends_with(b" "), ParseError::malformed_header("whitespace before colon"));

        let name = name.to_ascii_lowercase();
        ensure!(
            name.iter().copied().all(is_token_char),
            ParseError::malformed_header(format!("invalid field name {:?}", String::from_utf8_lossy(&name)))
        );

        // token chars are all ascii
        let name: String = name.iter().map(|b| char::from(*b)).collect();
        trace!(name = %name, consumed = line_end + CRLF.len(), "parsed header field");
        self.append(name, trim_spaces(value));

        Ok((line_end + CRLF.len(), false))
    }

    fn append(&mut self, name: String, value: &[u8]) {
        match self.inner.entry(name) {
            hash_map::Entry::Occupied(mut entry) => {
                let joined = entry.get_mut();
                joined.push(b',');
                joined.extend_from_slice(value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value.to_vec());
            }
        }
    }

    /// Looks up a field value as text, ignoring the case of `name`.
    ///
    /// Returns `None` if the field is absent or its value is not valid UTF-8.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_bytes(name).and_then(|value| std::str::from_utf8(value).ok())
    }

    /// Looks up the raw field value, ignoring the case of `name`.
    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.inner.get(&name.to_ascii_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_bytes(name).is_some()
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value.as_slice()))
    }
}

#[inline]
fn is_token_char(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || TOKEN_SPECIALS.contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_valid_header() {
        let mut headers = Headers::new();
        let (consumed, done) = headers.parse_one(b"Host: localhost:42069\r\n\r\n").unwrap();

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(consumed, 23);
        assert!(!done);
    }

    #[test]
    fn surrounding_spaces_are_trimmed() {
        let mut headers = Headers::new();
        let (consumed, done) = headers.parse_one(b"       Host:   localhost:42069       \r\n\r\n").unwrap();

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(consumed, 39);
        assert!(!done);
    }

    #[test]
    fn blank_line_ends_section() {
        let mut headers = Headers::new();
        let (consumed, done) = headers.parse_one(b"\r\nHost: ignored\r\n").unwrap();

        assert_eq!(consumed, 2);
        assert!(done);
        assert!(headers.is_empty());
    }

    #[test]
    fn partial_line_needs_more_bytes() {
        let mut headers = Headers::new();
        assert_eq!(headers.parse_one(b"Host: local").unwrap(), (0, false));
        assert_eq!(headers.parse_one(b"Host: localhost\r").unwrap(), (0, false));
        assert_eq!(headers.parse_one(b"").unwrap(), (0, false));
        assert!(headers.is_empty());
    }

    #[test]
    fn only_first_line_is_consumed() {
        let mut headers = Headers::new();
        let src = b"Host: localhost\r\nAccept: */*\r\n\r\n";

        let (consumed, done) = headers.parse_one(src).unwrap();
        assert_eq!(consumed, 17);
        assert!(!done);
        assert_eq!(headers.len(), 1);

        let (consumed, done) = headers.parse_one(&src[17..]).unwrap();
        assert_eq!(consumed, 13);
        assert!(!done);

        let (consumed, done) = headers.parse_one(&src[30..]).unwrap();
        assert_eq!(consumed, 2);
        assert!(done);

        assert_eq!(headers.get("accept"), Some("*/*"));
    }

    #[test]
    fn duplicate_names_are_comma_joined() {
        let mut headers = Headers::new();
        headers.parse_one(b"Foo: A\r\n").unwrap();
        headers.parse_one(b"Foo: B\r\n").unwrap();
        headers.parse_one(b"Foo:C\r\n").unwrap();

        assert_eq!(headers.get("foo"), Some("A,B,C"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut headers = Headers::new();
        headers.parse_one(b"Host: x\r\n").unwrap();
        headers.parse_one(b"HOST: y\r\n").unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("host"), Some("x,y"));
        assert_eq!(headers.get("HoSt"), Some("x,y"));
        assert!(headers.iter().all(|(name, _)| name == "host"));
    }

    #[test]
    fn space_before_colon_is_malformed() {
        let mut headers = Headers::new();
        let err = headers.parse_one(b"       Host : localhost:42069       \r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));

        let err = headers.parse_one(b"Foo : bar\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));
        assert!(headers.is_empty());
    }

    #[test]
    fn missing_colon_is_malformed() {
        let mut headers = Headers::new();
        let err = headers.parse_one(b"Host localhost\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));
    }

    #[test]
    fn empty_name_is_malformed() {
        let mut headers = Headers::new();
        let err = headers.parse_one(b": value\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));

        let err = headers.parse_one(b"   \r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));
    }

    #[test]
    fn invalid_name_characters_are_malformed() {
        for line in
            [&b"H\xa9st: localhost\r\n"[..], &b"Ho st: x\r\n"[..], &b"Host\"x: y\r\n"[..], &b"(host): z\r\n"[..]]
        {
            let mut headers = Headers::new();
            let err = headers.parse_one(line).unwrap_err();
            assert!(matches!(err, ParseError::MalformedHeader { .. }), "{line:?} should be malformed");
        }
    }

    #[test]
    fn token_specials_are_accepted() {
        let mut headers = Headers::new();
        headers.parse_one(b"X-Custom_Name.v2!#$%&'*+^`|~: ok\r\n").unwrap();
        assert_eq!(headers.get("x-custom_name.v2!#$%&'*+^`|~"), Some("ok"));
    }

    #[test]
    fn value_keeps_inner_whitespace_and_colons() {
        let mut headers = Headers::new();
        headers.parse_one(b"Accept-Encoding: gzip, deflate, br\r\n").unwrap();
        headers.parse_one(b"Referer: http://localhost:8080/a\r\n").unwrap();
        headers.parse_one(b"Empty:\r\n").unwrap();

        assert_eq!(headers.get("accept-encoding"), Some("gzip, deflate, br"));
        assert_eq!(headers.get("referer"), Some("http://localhost:8080/a"));
        assert_eq!(headers.get("empty"), Some(""));
    }

    #[test]
    fn value_bytes_are_kept_as_received() {
        let mut headers = Headers::new();
        headers.parse_one(b"Content-Disposition: attachment; filename=caf\xe9.txt\r\n").unwrap();

        assert_eq!(headers.get_bytes("content-disposition"), Some(&b"attachment; filename=caf\xe9.txt"[..]));
        assert_eq!(headers.get("content-disposition"), None);
        assert!(headers.contains("content-disposition"));
    }

    #[test]
    fn non_utf8_values_are_comma_joined() {
        let mut headers = Headers::new();
        headers.parse_one(b"X-Name: Ren\xe9\r\n").unwrap();
        headers.parse_one(b"X-Name: Zo\xeb\r\n").unwrap();

        assert_eq!(headers.get_bytes("x-name"), Some(&b"Ren\xe9,Zo\xeb"[..]));
    }
}
