use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;
use tracing::{error, info};

use crate::codec::RequestDecoder;
use crate::config::ParserConfig;
use crate::protocol::{ParseError, Request};

/// An HTTP connection that reads request heads from an async byte source
///
/// `HttpConnection` wraps the read half of a connection in a [`FramedRead`] driven by a
/// [`RequestDecoder`]. The framed reader owns the read buffer: it grows it when a line does
/// not fit, and drops the bytes the decoder consumed.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
///
/// # Example
///
/// ```
/// use http_head_parser::connection::HttpConnection;
///
/// # futures::executor::block_on(async {
/// let src = &b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n"[..];
/// let mut connection = HttpConnection::new(src);
///
/// let request = connection.read_request().await.unwrap().unwrap();
/// assert_eq!(request.request_line().unwrap().target(), Ok("/coffee"));
/// assert!(connection.read_request().await.unwrap().is_none());
/// # });
/// ```
#[derive(Debug)]
pub struct HttpConnection<R> {
    framed_read: FramedRead<R, RequestDecoder>,
}

impl<R> HttpConnection<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ParserConfig::default())
    }

    pub fn with_config(reader: R, config: &ParserConfig) -> Self {
        let decoder = RequestDecoder::with_config(config);
        Self { framed_read: FramedRead::with_capacity(reader, decoder, config.initial_capacity()) }
    }

    /// Reads the next request head.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))` once a head is complete, or when the source ends mid request
    ///   under [`EofPolicy::Lenient`](crate::config::EofPolicy::Lenient)
    /// - `Ok(None)` if the source ended before any byte of a new request arrived
    ///
    /// # Errors
    ///
    /// Returns the first parse error or [`ParseError::Io`]. The connection is unusable
    /// afterwards and should be dropped.
    pub async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        match self.framed_read.next().await {
            Some(Ok(request)) => Ok(Some(request)),

            Some(Err(e)) => {
                error!(cause = %e, "can't receive next request");
                Err(e)
            }

            None => {
                info!("cant read more request, break this connection down");
                Ok(None)
            }
        }
    }

    /// Bytes read from the source but not consumed by the parser.
    pub fn buffered(&self) -> &[u8] {
        self.framed_read.read_buffer()
    }

    pub fn into_inner(self) -> R {
        self.framed_read.into_inner()
    }
}
