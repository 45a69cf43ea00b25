use std::io;
use thiserror::Error;

/// Errors raised while validating or encoding an outgoing request.
///
/// Validation errors are produced before any byte of the affected item reaches an
/// output buffer. [`EncodeError::BodyStreamTooShort`] and [`EncodeError::Io`] happen
/// mid-encode and are fatal: bytes already handed to the transport cannot be taken back,
/// so the connection has to be abandoned.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid request target")]
    InvalidPath,

    #[error("invalid header name: {name:?}")]
    InvalidHeaderName { name: String },

    #[error("invalid header value: {reason}")]
    InvalidHeaderValue { reason: String },

    #[error("invalid header field: {reason}")]
    InvalidHeaderField { reason: String },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("invalid chunk extension: {reason}")]
    InvalidChunkExtension { reason: String },

    #[error("chunk queue is closed")]
    ChunkQueueClosed,

    #[error("body stream ended with {remaining} of {content_length} bytes still expected")]
    BodyStreamTooShort { content_length: u64, remaining: u64 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl EncodeError {
    pub fn invalid_header_name<N: AsRef<[u8]>>(name: N) -> Self {
        Self::InvalidHeaderName { name: String::from_utf8_lossy(name.as_ref()).into_owned() }
    }

    pub fn invalid_header_value<S: ToString>(str: S) -> Self {
        Self::InvalidHeaderValue { reason: str.to_string() }
    }

    pub fn invalid_header_field<S: ToString>(str: S) -> Self {
        Self::InvalidHeaderField { reason: str.to_string() }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn invalid_chunk_extension<S: ToString>(str: S) -> Self {
        Self::InvalidChunkExtension { reason: str.to_string() }
    }

    pub fn body_stream_too_short(content_length: u64, remaining: u64) -> Self {
        Self::BodyStreamTooShort { content_length, remaining }
    }

    /// Returns true if the error leaves the message unrecoverable after bytes were emitted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BodyStreamTooShort { .. } | Self::Io { .. })
    }
}
