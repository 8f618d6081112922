//! HTTP request decoder module
//!
//! This module adapts the [`Request`] state machine to the [`Decoder`] trait so it can be
//! driven by anything that manages a [`BytesMut`] read buffer, most notably
//! [`FramedRead`](tokio_util::codec::FramedRead).
//!
//! # Example
//!
//! ```
//! use http_head_parser::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET /coffee HTTP/1.1\r\nHost: local"[..]);
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//! assert_eq!(&buffer[..], b"Host: local");
//!
//! buffer.extend_from_slice(b"host\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.request_line().unwrap().target(), Ok("/coffee"));
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, warn};

use crate::config::{EofPolicy, ParserConfig};
use crate::ensure;
use crate::protocol::{ParseError, ParseState, Request};

/// A decoder for HTTP request heads.
///
/// Each call to [`Decoder::decode`] feeds the buffered bytes to the current [`Request`] and
/// drops the consumed ones from the front of the buffer. Bytes belonging to an incomplete
/// line stay in the buffer until more data arrives.
///
/// # State Machine
///
/// The decoder tracks its state through the request it is filling:
/// - [`ParseState::Init`] / [`ParseState::ParsingHeaders`]: more bytes are needed
/// - [`ParseState::Done`]: the request is handed out and a fresh one takes its place
/// - [`ParseState::Error`]: every later call fails with [`ParseError::InvalidState`]
#[derive(Debug, Default)]
pub struct RequestDecoder {
    request: Request,
    /// head bytes already consumed for the current request
    consumed: usize,
    max_head_size: Option<usize>,
    eof_policy: EofPolicy,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ParserConfig) -> Self {
        Self { max_head_size: config.max_head_size(), eof_policy: config.eof_policy(), ..Self::default() }
    }

    /// The request currently being parsed.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Handles the end of the byte source according to the configured [`EofPolicy`].
    ///
    /// Under [`EofPolicy::Lenient`] the current request is marked done and returned as is,
    /// and any bytes of an incomplete line left in `src` are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedEof`] under [`EofPolicy::Strict`].
    pub fn finish(&mut self, src: &mut BytesMut) -> Result<Request, ParseError> {
        ensure!(!self.request.is_error(), ParseError::InvalidState);

        match self.eof_policy {
            EofPolicy::Lenient => {
                if !src.is_empty() || self.request.state() != ParseState::Init {
                    warn!(
                        state = ?self.request.state(),
                        discarded = src.len(),
                        "source ended mid request, finishing leniently"
                    );
                }
                src.clear();
                self.request.finish();
                Ok(self.take_request())
            }
            EofPolicy::Strict => {
                warn!(
                    state = ?self.request.state(),
                    pending = src.len(),
                    "source ended before request head was complete"
                );
                Err(ParseError::UnexpectedEof)
            }
        }
    }

    fn take_request(&mut self) -> Request {
        self.consumed = 0;
        mem::take(&mut self.request)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request head from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the header section is complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: the bytes are not a valid request head, or the configured size limit
    ///   was exceeded
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let consumed = self.request.advance(src)?;
        src.advance(consumed);
        self.consumed += consumed;

        if self.request.is_done() {
            debug!(head_size = self.consumed, "decoded request head");
            return Ok(Some(self.take_request()));
        }

        if let Some(max_size) = self.max_head_size {
            let current_size = self.consumed + src.len();
            if current_size > max_size {
                self.request.fail();
                return Err(ParseError::too_large_header(current_size, max_size));
            }
        }

        Ok(None)
    }

    /// Decodes what is left once the source has ended.
    ///
    /// A source that ends with no bytes of a new request is a clean close and yields
    /// `Ok(None)`; anything else is handed to [`RequestDecoder::finish`].
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        if self.request.state() == ParseState::Init && src.is_empty() {
            return Ok(None);
        }

        self.finish(src).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn crlf(text: &str) -> BytesMut {
        BytesMut::from(text.replace('\n', "\r\n").as_bytes())
    }

    #[test]
    fn from_curl() {
        let mut buf = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        let line = request.request_line().unwrap();
        assert_eq!(line.method(), "GET");
        assert_eq!(line.target(), Ok("/index.html"));
        assert_eq!(line.version(), "1.1");

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("127.0.0.1:8080"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.79.1"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(buf.is_empty());
    }

    #[test]
    fn from_edge() {
        let mut buf = crlf(indoc! {r##"
        GET /index/?a=1&b=2&a=3 HTTP/1.1
        Host: 127.0.0.1:8080
        Connection: keep-alive
        Cache-Control: max-age=0
        sec-ch-ua: "#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109"
        sec-ch-ua-mobile: ?0
        sec-ch-ua-platform: "macOS"
        Upgrade-Insecure-Requests: 1
        User-Agent: Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36 Edg/109.0.1518.52
        Accept: text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9
        Sec-Fetch-Site: none
        Sec-Fetch-Mode: navigate
        Sec-Fetch-User: ?1
        Sec-Fetch-Dest: document
        Accept-Encoding: gzip, deflate, br
        Accept-Language: zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7

        "##});

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.request_line().unwrap().target(), Ok("/index/?a=1&b=2&a=3"));
        assert_eq!(request.headers().len(), 15);
        assert_eq!(
            request.headers().get("sec-ch-ua"),
            Some(r##""#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109""##)
        );
        assert_eq!(request.headers().get("sec-ch-ua-platform"), Some("\"macOS\""));
        assert_eq!(request.headers().get("Sec-Fetch-Mode"), Some("navigate"));
        assert_eq!(request.headers().get("accept-language"), Some("zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"));
    }

    #[test]
    fn consumed_bytes_leave_the_buffer() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: a\r\nAcc"[..]);

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(&buf[..], b"Acc");
        assert_eq!(decoder.request().state(), ParseState::ParsingHeaders);

        buf.extend_from_slice(b"ept: */*\r\n\r\n123");
        let request = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert_eq!(&buf[..], b"123");
        assert_eq!(decoder.request().state(), ParseState::Init);
    }

    #[test]
    fn errors_are_sticky() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(&b"G3T / HTTP/1.1\r\n\r\n"[..]);

        let err = decoder.decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRequestLine { .. }));

        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);
        let err = decoder.decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::InvalidState));

        let err = decoder.decode_eof(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::InvalidState));
    }

    #[test]
    fn head_size_limit() {
        let config = ParserConfig::default().with_max_head_size(36);
        let mut decoder = RequestDecoder::with_config(&config);
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n"[..]);
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"X-Long");
        let err = decoder.decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::TooLargeHeader { current_size: 39, max_size: 36 }));

        buf.extend_from_slice(b": 1\r\n\r\n");
        assert!(matches!(decoder.decode(&mut buf).unwrap_err(), ParseError::InvalidState));
    }

    #[test]
    fn head_size_limit_is_per_request() {
        let config = ParserConfig::default().with_max_head_size(20);
        let mut decoder = RequestDecoder::with_config(&config);

        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);
        assert!(decoder.decode(&mut buf).unwrap().is_some());

        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);
        assert!(decoder.decode(&mut buf).unwrap().is_some());
    }

    #[test]
    fn eof_with_nothing_buffered_is_a_clean_close() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::new();
        assert!(decoder.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn lenient_eof_finishes_partial_request() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(&b"GET /coffee HTTP/1.1\r\nHost: localhost\r\nAccept: */"[..]);

        let request = decoder.decode_eof(&mut buf).unwrap().unwrap();
        assert!(request.is_done());
        assert_eq!(request.request_line().unwrap().target(), Ok("/coffee"));
        assert_eq!(request.headers().get("host"), Some("localhost"));
        assert!(!request.headers().contains("accept"));
        assert!(buf.is_empty());

        assert!(decoder.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn lenient_eof_without_request_line() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(&b"GET /cof"[..]);

        let request = decoder.decode_eof(&mut buf).unwrap().unwrap();
        assert!(request.is_done());
        assert!(request.request_line().is_none());
    }

    #[test]
    fn strict_eof_is_an_error() {
        let config = ParserConfig::default().with_eof_policy(EofPolicy::Strict);
        let mut decoder = RequestDecoder::with_config(&config);
        let mut buf = BytesMut::from(&b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n"[..]);

        let err = decoder.decode_eof(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof));
    }

    #[test]
    fn strict_eof_after_complete_head_is_fine() {
        let config = ParserConfig::default().with_eof_policy(EofPolicy::Strict);
        let mut decoder = RequestDecoder::with_config(&config);
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);

        assert!(decoder.decode_eof(&mut buf).unwrap().is_some());
        assert!(decoder.decode_eof(&mut buf).unwrap().is_none());
    }
}
