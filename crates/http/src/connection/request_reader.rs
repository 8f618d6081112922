use std::io::{self, Read};

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

use crate::codec::RequestDecoder;
use crate::config::ParserConfig;
use crate::protocol::{ParseError, Request};

/// Reads a request head from a blocking byte source.
///
/// The reader keeps a read window of `capacity` bytes. Each round reads into the free part
/// of the window, feeds everything buffered to a [`RequestDecoder`] and drops the bytes it
/// consumed. When the window is full of unconsumed bytes (a single line longer than the
/// window) the capacity doubles before the next read, so there is no ceiling on line length
/// unless [`ParserConfig::with_max_head_size`] sets one.
///
/// # Example
///
/// ```
/// use http_head_parser::connection::RequestReader;
///
/// let src = &b"GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n"[..];
/// let mut reader = RequestReader::new(src);
///
/// let request = reader.read_request().unwrap().unwrap();
/// assert_eq!(request.request_line().unwrap().method(), "GET");
/// assert_eq!(request.headers().get("host"), Some("localhost:42069"));
///
/// // the source is exhausted
/// assert!(reader.read_request().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    decoder: RequestDecoder,
    buffer: BytesMut,
    capacity: usize,
}

impl<R: Read> RequestReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ParserConfig::default())
    }

    pub fn with_config(reader: R, config: &ParserConfig) -> Self {
        let capacity = config.initial_capacity();
        let buffer = BytesMut::with_capacity(capacity);
        Self { reader, decoder: RequestDecoder::with_config(config), buffer, capacity }
    }

    /// Reads until a complete request head has been parsed.
    ///
    /// Reads failing with [`io::ErrorKind::Interrupted`] are retried.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))` once a head is complete, or when the source ends mid request
    ///   under [`EofPolicy::Lenient`](crate::config::EofPolicy::Lenient)
    /// - `Ok(None)` if the source ended before any byte of a new request arrived, which is
    ///   also what every call after the end of the source returns
    ///
    /// # Errors
    ///
    /// Returns the first parse error, [`ParseError::UnexpectedEof`] if the source ends mid
    /// request under [`EofPolicy::Strict`](crate::config::EofPolicy::Strict), or
    /// [`ParseError::Io`] carrying the byte source's error.
    pub fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        if !self.buffer.is_empty() {
            if let Some(request) = self.decode()? {
                return Ok(Some(request));
            }
        }

        loop {
            if self.buffer.len() >= self.capacity {
                self.grow();
            }

            let read = self.fill().map_err(|e| {
                warn!(cause = %e, "failed to read from byte source");
                ParseError::io(e)
            })?;

            if read == 0 {
                trace!(buffered = self.buffer.len(), "byte source reached end");
                return self.decoder.decode_eof(&mut self.buffer);
            }

            trace!(read, buffered = self.buffer.len(), "read from byte source");
            if let Some(request) = self.decode()? {
                return Ok(Some(request));
            }
        }
    }

    fn decode(&mut self) -> Result<Option<Request>, ParseError> {
        self.decoder.decode(&mut self.buffer).inspect_err(|e| warn!(cause = %e, "failed to parse request head"))
    }

    /// Reads once into the free part of the window and returns the number of new bytes.
    fn fill(&mut self) -> io::Result<usize> {
        let filled = self.buffer.len();
        self.buffer.resize(self.capacity, 0);

        let result = loop {
            match self.reader.read(&mut self.buffer[filled..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                result => break result,
            }
        };

        self.buffer.truncate(filled + result.as_ref().map_or(0, |read| *read));
        result
    }

    fn grow(&mut self) {
        self.capacity *= 2;
        self.buffer.reserve(self.capacity - self.buffer.len());
        debug!(capacity = self.capacity, "read buffer full, doubled capacity");
    }

    /// Current size of the read window.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes read from the source but not consumed by the parser.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Parses one request head from `reader` with the default [`ParserConfig`].
///
/// The source ending first is not an error: whatever was parsed comes back as a
/// [`ParseState::Done`](crate::protocol::ParseState::Done) request, empty if the source was.
///
/// # Errors
///
/// See [`RequestReader::read_request`].
pub fn parse_from<R: Read>(reader: R) -> Result<Request, ParseError> {
    let mut reader = RequestReader::new(reader);
    match reader.read_request()? {
        Some(request) => Ok(request),
        None => reader.decoder.finish(&mut reader.buffer),
    }
}
