//! The request being parsed and the state machine that fills it in.
//!
//! A [`Request`] starts in [`ParseState::Init`] and is advanced by feeding it whatever bytes
//! are currently buffered through [`Request::advance`]. The state moves to
//! [`ParseState::ParsingHeaders`] once the request-line is read and to [`ParseState::Done`]
//! once the blank line after the headers is read. Any parse failure moves it to
//! [`ParseState::Error`], which is terminal: no further input is looked at.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::protocol::{Headers, ParseError, RequestLine};

/// Where a [`Request`] is in its parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ParseState {
    /// Waiting for the request-line
    #[default]
    Init,
    /// Request-line read, reading header lines
    ParsingHeaders,
    /// Header section complete
    Done,
    /// A previous parse failed
    Error,
}

/// An HTTP/1.1 request head.
///
/// The body is always empty; reading it is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct Request {
    request_line: Option<RequestLine>,
    headers: Headers,
    body: Bytes,
    state: ParseState,
}

impl Request {
    /// Creates an empty request in [`ParseState::Init`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds `src` to the state machine and returns how many bytes were consumed.
    ///
    /// All complete lines in `src` are consumed in one call. The remaining bytes, if any, are
    /// an incomplete line; the caller must keep them and pass them again, followed by newly
    /// read bytes, on the next call.
    ///
    /// Once the request is [`ParseState::Done`] this returns `Ok(0)` without looking at `src`.
    ///
    /// # Errors
    ///
    /// Any error from the request-line or header parser, after which the request is in
    /// [`ParseState::Error`]. Calling `advance` on a request in that state fails with
    /// [`ParseError::InvalidState`].
    pub fn advance(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let mut total = 0;
        while !self.is_done() {
            let consumed = match self.advance_once(&src[total..]) {
                Ok(consumed) => consumed,
                Err(e) => {
                    self.state = ParseState::Error;
                    return Err(e);
                }
            };

            if consumed == 0 {
                break;
            }
            total += consumed;
        }

        Ok(total)
    }

    fn advance_once(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Error => Err(ParseError::InvalidState),

            ParseState::Init => match RequestLine::parse(src)? {
                Some((request_line, consumed)) => {
                    self.request_line = Some(request_line);
                    self.state = ParseState::ParsingHeaders;
                    trace!(consumed, "request line complete, parsing headers");
                    Ok(consumed)
                }
                None => Ok(0),
            },

            ParseState::ParsingHeaders => {
                let (consumed, done) = self.headers.parse_one(src)?;
                if done {
                    self.state = ParseState::Done;
                    debug!(header_count = self.headers.len(), "request head complete");
                }
                Ok(consumed)
            }

            ParseState::Done => Ok(0),
        }
    }

    /// Marks the request as complete with whatever has been parsed so far.
    ///
    /// Used by the drivers when the byte source ends under a lenient EOF policy.
    pub(crate) fn finish(&mut self) {
        self.state = ParseState::Done;
    }

    /// Moves the request to [`ParseState::Error`] for failures detected outside the parsers.
    pub(crate) fn fail(&mut self) {
        self.state = ParseState::Error;
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    pub fn is_error(&self) -> bool {
        self.state == ParseState::Error
    }

    /// The request-line, present once the state machine has left [`ParseState::Init`].
    pub fn request_line(&self) -> Option<&RequestLine> {
        self.request_line.as_ref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Converts the parsed head into an [`http::Request`].
    ///
    /// # Errors
    ///
    /// - [`ParseError::IncompleteRequest`] if no request-line was parsed
    /// - [`ParseError::InvalidUri`] if the target is not a valid URI, which includes any
    ///   target that is not ASCII
    /// - [`ParseError::MalformedHeader`] if a field value is not a valid [`http::HeaderValue`]
    /// - [`ParseError::InvalidHttpRequest`] if the request can't be assembled
    pub fn into_http(self) -> Result<http::Request<Bytes>, ParseError> {
        let request_line = self.request_line.ok_or(ParseError::IncompleteRequest)?;

        let method = http::Method::from_bytes(request_line.method().as_bytes())
            .map_err(|e| ParseError::invalid_request_line(e.to_string()))?;
        let uri = http::Uri::try_from(request_line.target_bytes()).map_err(|_e| ParseError::InvalidUri)?;

        let mut builder = http::Request::builder().method(method).uri(uri).version(http::Version::HTTP_11);

        if let Some(headers) = builder.headers_mut() {
            headers.reserve(self.headers.len());
            for (name, value) in self.headers.iter() {
                let name = http::HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| ParseError::malformed_header(e.to_string()))?;
                let value =
                    http::HeaderValue::from_bytes(value).map_err(|e| ParseError::malformed_header(e.to_string()))?;
                headers.insert(name, value);
            }
        }

        Ok(builder.body(self.body)?)
    }
}

impl TryFrom<Request> for http::Request<Bytes> {
    type Error = ParseError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        request.into_http()
    }
}
