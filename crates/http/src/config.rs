//! Parser configuration shared by the sync and async drivers.

/// Size of the first read window.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// What to do when the byte source ends before the header section is complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Treat end-of-source as completion and return whatever was parsed so far.
    ///
    /// This tolerates a peer that closes the connection right after its last header line.
    /// The returned request may lack a request-line or some headers.
    #[default]
    Lenient,
    /// Fail with [`ParseError::UnexpectedEof`](crate::protocol::ParseError::UnexpectedEof).
    Strict,
}

/// Settings for [`RequestReader`](crate::connection::RequestReader),
/// [`HttpConnection`](crate::connection::HttpConnection) and
/// [`RequestDecoder`](crate::codec::RequestDecoder).
///
/// # Example
///
/// ```
/// use http_head_parser::{EofPolicy, ParserConfig};
///
/// let config = ParserConfig::default()
///     .with_initial_capacity(64)
///     .with_max_head_size(8 * 1024)
///     .with_eof_policy(EofPolicy::Strict);
///
/// assert_eq!(config.initial_capacity(), 64);
/// assert_eq!(config.max_head_size(), Some(8 * 1024));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    initial_capacity: usize,
    max_head_size: Option<usize>,
    eof_policy: EofPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { initial_capacity: DEFAULT_INITIAL_CAPACITY, max_head_size: None, eof_policy: EofPolicy::default() }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first read window. Zero is raised to one so the driver can always make progress.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(1);
        self
    }

    /// Caps the number of bytes the request-line and headers may take up.
    ///
    /// Without a cap the read buffer keeps doubling until a line fits.
    #[must_use]
    pub fn with_max_head_size(mut self, max: usize) -> Self {
        self.max_head_size = Some(max);
        self
    }

    #[must_use]
    pub fn with_eof_policy(mut self, policy: EofPolicy) -> Self {
        self.eof_policy = policy;
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn max_head_size(&self) -> Option<usize> {
        self.max_head_size
    }

    pub fn eof_policy(&self) -> EofPolicy {
        self.eof_policy
    }
}
