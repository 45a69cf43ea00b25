//! Limits and buffer sizes used while validating and encoding a request.

/// Default maximum number of header fields in one request
pub const DEFAULT_MAX_HEADER_NUM: usize = 128;

/// Default maximum size in bytes of the rendered request line plus header block
pub const DEFAULT_MAX_HEADER_BYTES: usize = 64 * 1024;

/// Default size of the scratch buffer used to pull bytes out of a body source
pub const DEFAULT_BODY_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Default size of the bounded output buffer used by the request writer
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 16 * 1024;

/// Encoder configuration.
///
/// # Example
///
/// ```
/// use micro_http_encoder::codec::EncoderConfig;
///
/// let config = EncoderConfig::new().max_header_num(32).write_buffer_size(4096);
/// assert_eq!(config.get_max_header_num(), 32);
/// assert_eq!(config.get_write_buffer_size(), 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    max_header_num: usize,
    max_header_bytes: usize,
    body_read_buffer_size: usize,
    write_buffer_size: usize,
}

impl EncoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests with more header fields are rejected with `TooManyHeaders`.
    pub fn max_header_num(mut self, max_header_num: usize) -> Self {
        self.max_header_num = max_header_num;
        self
    }

    /// Requests whose rendered head is larger are rejected with `TooLargeHeader`.
    pub fn max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    /// Upper bound for a single read from a body source; values below 1 are raised to 1.
    pub fn body_read_buffer_size(mut self, size: usize) -> Self {
        self.body_read_buffer_size = size.max(1);
        self
    }

    /// Capacity of each buffer the request writer fills before flushing; values below 1 are raised to 1.
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = size.max(1);
        self
    }

    pub fn get_max_header_num(&self) -> usize {
        self.max_header_num
    }

    pub fn get_max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }

    pub fn get_body_read_buffer_size(&self) -> usize {
        self.body_read_buffer_size
    }

    pub fn get_write_buffer_size(&self) -> usize {
        self.write_buffer_size
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_header_num: DEFAULT_MAX_HEADER_NUM,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            body_read_buffer_size: DEFAULT_BODY_READ_BUFFER_SIZE,
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
        }
    }
}
