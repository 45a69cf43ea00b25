use crate::protocol::body::BoxBody;
use crate::protocol::{EncodeError, EncodeStatus};
use bytes::BufMut;
use std::io::ErrorKind;
use tracing::{error, trace};

/// Copies exactly `content_length` bytes out of a body source.
///
/// Every read is bounded by the remaining length, the destination capacity and the
/// scratch buffer, so no byte past `content_length` is ever pulled from the source.
pub struct LengthEncoder {
    content_length: u64,
    remaining: u64,
    source: Option<BoxBody>,
    scratch: Box<[u8]>,
}

impl LengthEncoder {
    pub fn new(content_length: u64, source: Option<BoxBody>, read_buffer_size: usize) -> Self {
        let scratch_len = usize::try_from(content_length).map_or(read_buffer_size, |len| len.min(read_buffer_size)).max(1);
        Self { content_length, remaining: content_length, source, scratch: vec![0; scratch_len].into_boxed_slice() }
    }

    pub fn encode<B: BufMut>(&mut self, dst: &mut B) -> Result<EncodeStatus, EncodeError> {
        loop {
            if self.remaining == 0 {
                return Ok(EncodeStatus::Complete);
            }

            let capacity = dst.remaining_mut().min(self.scratch.len());
            if capacity == 0 {
                return Ok(EncodeStatus::Incomplete);
            }
            let want = usize::try_from(self.remaining).map_or(capacity, |remaining| remaining.min(capacity));

            let Some(source) = self.source.as_mut() else {
                error!(content_length = self.content_length, "no body source for a fixed length body");
                return Err(EncodeError::body_stream_too_short(self.content_length, self.remaining));
            };

            let read = match source.read(&mut self.scratch[..want]) {
                Ok(0) => {
                    error!(
                        content_length = self.content_length,
                        remaining = self.remaining,
                        "body source ended before content-length bytes were read"
                    );
                    return Err(EncodeError::body_stream_too_short(self.content_length, self.remaining));
                }
                Ok(read) => read.min(want),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(cause = %e, "failed to read body source");
                    return Err(e.into());
                }
            };

            dst.put_slice(&self.scratch[..read]);
            self.remaining -= read as u64;
            trace!(read, remaining = self.remaining, "copied body bytes");
        }
    }
}

impl std::fmt::Debug for LengthEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LengthEncoder")
            .field("content_length", &self.content_length)
            .field("remaining", &self.remaining)
            .field("has_source", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::body::{BodySource, ReaderBody};
    use bytes::{Bytes, BytesMut};
    use std::io;

    fn boxed<B: BodySource + Send + 'static>(body: B) -> Option<BoxBody> {
        Some(Box::new(body))
    }

    #[test]
    fn copies_exact_length() {
        let mut encoder = LengthEncoder::new(16, boxed(Bytes::from_static(b"write more tests")), 8192);
        let mut dst = BytesMut::new();

        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"write more tests");

        let mut dst = BytesMut::new();
        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Complete);
        assert!(dst.is_empty());
    }

    #[test]
    fn never_reads_past_content_length() {
        let mut encoder = LengthEncoder::new(5, boxed(Bytes::from_static(b"write more tests")), 8192);
        let mut dst = BytesMut::new();

        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"write");
    }

    #[test]
    fn resumes_across_small_buffers() {
        let mut encoder = LengthEncoder::new(16, boxed(Bytes::from_static(b"write more tests")), 3);
        let mut out = Vec::new();

        loop {
            let mut buf = [0u8; 5];
            let mut dst = &mut buf[..];
            let status = encoder.encode(&mut dst).unwrap();
            let written = 5 - dst.len();
            out.extend_from_slice(&buf[..written]);
            if status == EncodeStatus::Complete {
                break;
            }
            assert_eq!(status, EncodeStatus::Incomplete);
        }

        assert_eq!(out, b"write more tests");
    }

    #[test]
    fn short_source() {
        let mut encoder = LengthEncoder::new(20, boxed(Bytes::from_static(b"write more tests")), 8192);
        let mut dst = BytesMut::new();

        let err = encoder.encode(&mut dst).unwrap_err();
        assert!(matches!(err, EncodeError::BodyStreamTooShort { content_length: 20, remaining: 4 }), "{err:?}");
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_source() {
        let mut encoder = LengthEncoder::new(4, None, 8192);
        let err = encoder.encode(&mut BytesMut::new()).unwrap_err();
        assert!(matches!(err, EncodeError::BodyStreamTooShort { content_length: 4, remaining: 4 }), "{err:?}");
    }

    struct Flaky {
        interrupted: bool,
        data: &'static [u8],
    }

    impl BodySource for Flaky {
        fn known_length(&self) -> Option<u64> {
            None
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            io::Read::read(&mut self.data, buf)
        }
    }

    #[test]
    fn retries_interrupted_reads() {
        let mut encoder = LengthEncoder::new(4, boxed(Flaky { interrupted: false, data: b"abcd" }), 8192);
        let mut dst = BytesMut::new();
        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"abcd");
    }

    #[test]
    fn read_errors_are_io_errors() {
        struct Broken;
        impl BodySource for Broken {
            fn known_length(&self) -> Option<u64> {
                Some(4)
            }

            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(ErrorKind::BrokenPipe))
            }
        }

        let mut encoder = LengthEncoder::new(4, boxed(Broken), 8192);
        let err = encoder.encode(&mut BytesMut::new()).unwrap_err();
        assert!(matches!(&err, EncodeError::Io { source } if source.kind() == ErrorKind::BrokenPipe), "{err:?}");
    }

    #[test]
    fn reader_body_with_zero_capacity_waits() {
        let mut encoder = LengthEncoder::new(3, boxed(ReaderBody::with_length(&b"abc"[..], 3)), 8192);
        let mut buf = [0u8; 0];
        let mut dst = &mut buf[..];
        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Incomplete);

        let mut dst = BytesMut::new();
        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"abc");
    }
}
