/// Represents the body framing chosen for an outgoing request.
///
/// This enum is used to determine how the payload should be encoded:
/// - Known length: Copy exact number of bytes from the body source
/// - Chunked: Frame queued chunks using chunked transfer encoding
/// - Empty: No payload to encode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Payload using chunked transfer encoding
    Chunked,
    /// Empty payload (no body)
    Empty,
}

impl From<u64> for PayloadSize {
    fn from(length: u64) -> Self {
        if length == 0 { PayloadSize::Empty } else { PayloadSize::Length(length) }
    }
}

/// Outcome of one drive step of the request encoder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EncodeStatus {
    /// The whole message has been written
    Complete,
    /// The output buffer is full, more bytes remain
    Incomplete,
    /// The chunk queue is empty and not closed yet; enqueue chunks or mark the end first
    WaitingForChunks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_size_from_length() {
        assert_eq!(PayloadSize::from(0), PayloadSize::Empty);
        assert_eq!(PayloadSize::from(16), PayloadSize::Length(16));
        assert_eq!(PayloadSize::from(u64::MAX), PayloadSize::Length(u64::MAX));
    }
}
