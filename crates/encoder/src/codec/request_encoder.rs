use crate::codec::body::PayloadEncoder;
use crate::codec::{build_plan_with, EncodePlan, EncoderConfig};
use crate::protocol::body::BoxBody;
use crate::protocol::{Chunk, ChunkQueue, EncodeError, EncodeStatus, HeaderField, OutgoingRequest};
use crate::utils::write_some;
use bytes::{BufMut, Bytes};
use std::io;
use std::io::ErrorKind;
use tracing::{debug, error, trace};

/// Where the encoder stands in the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncoderState {
    /// nothing written yet
    #[default]
    Init,
    /// writing the request line and header block
    Head,
    /// writing a fixed-length (possibly empty) body
    Body,
    /// writing chunks from the chunk queue
    Chunk,
    /// the whole message has been written
    Done,
    /// a fatal error happened mid-message, the connection must be dropped
    Failed,
}

/// Resumable encoder for a single outgoing request.
///
/// [`RequestEncoder::drive`] copies as many bytes as the destination can take and
/// remembers the exact position, so the message may be split anywhere across calls.
///
/// ```
/// use micro_http_encoder::codec::RequestEncoder;
/// use micro_http_encoder::protocol::{EncodeStatus, OutgoingRequest};
///
/// let mut request = OutgoingRequest::new("GET", "/");
/// request.add_header(("Host", "example.com"));
///
/// let mut encoder = RequestEncoder::from_request(request).unwrap();
/// let mut wire = Vec::new();
/// loop {
///     let mut buf = [0u8; 8];
///     let mut dst = &mut buf[..];
///     let status = encoder.drive(&mut dst).unwrap();
///     let written = 8 - dst.len();
///     wire.extend_from_slice(&buf[..written]);
///     if status == EncodeStatus::Complete {
///         break;
///     }
/// }
/// assert_eq!(wire, b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");
/// ```
#[derive(Debug)]
pub struct RequestEncoder {
    plan: EncodePlan,
    state: EncoderState,
    head: Bytes,
    payload_encoder: PayloadEncoder,
}

impl RequestEncoder {
    /// Creates an encoder for an already validated plan.
    ///
    /// `body` is read for fixed-length framing only, chunked bodies come from the chunk queue.
    pub fn new(plan: EncodePlan, body: Option<BoxBody>) -> Self {
        Self::with_read_buffer_size(plan, body, EncoderConfig::default().get_body_read_buffer_size())
    }

    /// Validates `request` with default limits and creates its encoder.
    ///
    /// # Errors
    ///
    /// Any validation error of [`build_plan`](crate::codec::build_plan); nothing is encoded then.
    pub fn from_request(request: OutgoingRequest) -> Result<Self, EncodeError> {
        Self::with_config(request, &EncoderConfig::default())
    }

    /// Validates `request` against `config` and creates its encoder.
    pub fn with_config(mut request: OutgoingRequest, config: &EncoderConfig) -> Result<Self, EncodeError> {
        let plan = build_plan_with(&request, config)?;
        Ok(Self::with_read_buffer_size(plan, request.take_body(), config.get_body_read_buffer_size()))
    }

    fn with_read_buffer_size(plan: EncodePlan, body: Option<BoxBody>, read_buffer_size: usize) -> Self {
        let payload_encoder = PayloadEncoder::from_payload_size(plan.payload_size(), body, read_buffer_size);
        Self { plan, state: EncoderState::Init, head: Bytes::new(), payload_encoder }
    }

    pub fn plan(&self) -> &EncodePlan {
        &self.plan
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// True once the message is complete or the encoder failed.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, EncoderState::Done | EncoderState::Failed)
    }

    /// The chunk queue of a chunked request, `None` for fixed-length framing.
    pub fn chunk_queue_mut(&mut self) -> Option<&mut ChunkQueue> {
        self.payload_encoder.chunk_queue_mut()
    }

    /// Appends a chunk to a chunked request.
    ///
    /// # Errors
    ///
    /// [`EncodeError::ChunkQueueClosed`] for fixed-length requests or once the end was marked,
    /// [`EncodeError::InvalidChunkExtension`] for malformed extensions.
    pub fn enqueue_chunk<C: Into<Chunk>>(&mut self, chunk: C) -> Result<(), EncodeError> {
        self.chunk_queue_mut().ok_or(EncodeError::ChunkQueueClosed)?.enqueue(chunk)
    }

    /// Marks the end of a chunked body, optionally with trailer fields.
    pub fn mark_no_more_chunks(&mut self, trailers: Option<Vec<HeaderField>>) -> Result<(), EncodeError> {
        self.chunk_queue_mut().ok_or(EncodeError::ChunkQueueClosed)?.mark_no_more_chunks(trailers)
    }

    /// Writes the next bytes of the message into `dst`, at most `dst.remaining_mut()` of them.
    ///
    /// Returns [`EncodeStatus::Incomplete`] when `dst` filled up, [`EncodeStatus::WaitingForChunks`]
    /// when a chunked body ran out of queued chunks and [`EncodeStatus::Complete`] once the last byte
    /// was written.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::BodyStreamTooShort`] or [`EncodeError::Io`] when the body source fails; the
    ///   encoder is `Failed` afterwards and the connection must not be reused
    /// - [`EncodeError::Io`] of kind `InvalidInput` when driven after `Done` or `Failed`
    pub fn drive<B: BufMut>(&mut self, dst: &mut B) -> Result<EncodeStatus, EncodeError> {
        loop {
            match self.state {
                EncoderState::Init => {
                    trace!(header_bytes = self.plan.header_block().len(), "start encoding request");
                    self.head = self.plan.header_block().clone();
                    self.state = EncoderState::Head;
                }

                EncoderState::Head => {
                    if !write_some(&mut self.head, dst) {
                        return Ok(EncodeStatus::Incomplete);
                    }
                    self.state =
                        if self.payload_encoder.is_chunked() { EncoderState::Chunk } else { EncoderState::Body };
                }

                EncoderState::Body | EncoderState::Chunk => match self.payload_encoder.encode(dst) {
                    Ok(EncodeStatus::Complete) => {
                        debug!(
                            chunked = self.plan.has_chunked_encoding(),
                            content_length = self.plan.content_length(),
                            "request encoded"
                        );
                        self.state = EncoderState::Done;
                        return Ok(EncodeStatus::Complete);
                    }
                    Ok(status) => return Ok(status),
                    Err(e) => {
                        error!(cause = %e, state = ?self.state, "encode request body error");
                        self.state = EncoderState::Failed;
                        return Err(e);
                    }
                },

                EncoderState::Done | EncoderState::Failed => {
                    error!(state = ?self.state, "drive called on a finished request encoder");
                    return Err(io::Error::from(ErrorKind::InvalidInput).into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::build_plan;
    use crate::logging::LoggingHandle;
    use crate::protocol::body::ReaderBody;
    use bytes::BytesMut;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn put_request(body: &'static [u8], headers: &[HeaderField]) -> OutgoingRequest {
        let mut request = OutgoingRequest::new("PUT", "/");
        request.add_header(("Host", "amazon.com"));
        request.add_headers(headers.iter().cloned());
        request.set_body(Bytes::from_static(body));
        request
    }

    fn chunked_request() -> OutgoingRequest {
        let mut request = OutgoingRequest::new("POST", "/upload");
        request.add_header(("Host", "amazon.com")).add_header(("Transfer-Encoding", "chunked"));
        request
    }

    /// Drives until `Complete` using output buffers of `size` bytes.
    fn drive_with(encoder: &mut RequestEncoder, size: usize) -> Vec<u8> {
        let mut wire = Vec::new();
        loop {
            let mut buf = BytesMut::new();
            let status = encoder.drive(&mut (&mut buf).limit(size)).unwrap();
            assert!(buf.len() <= size);
            wire.extend_from_slice(&buf);
            match status {
                EncodeStatus::Complete => return wire,
                EncodeStatus::Incomplete => {}
                EncodeStatus::WaitingForChunks => panic!("unexpected wait for chunks"),
            }
        }
    }

    #[test]
    fn fixed_length_request() {
        let _logging = LoggingHandle::for_tests();
        let request = put_request(b"write more tests", &[HeaderField::from_static("Content-Length", "16")]);
        let mut encoder = RequestEncoder::from_request(request).unwrap();
        assert_eq!(encoder.state(), EncoderState::Init);

        let wire = drive_with(&mut encoder, 1024);

        assert_eq!(
            &wire[..],
            &b"PUT / HTTP/1.1\r\nHost: amazon.com\r\nContent-Length: 16\r\n\r\nwrite more tests"[..]
        );
        assert_eq!(encoder.state(), EncoderState::Done);
        assert!(encoder.is_finished());
    }

    #[test]
    fn request_without_body() {
        let mut request = OutgoingRequest::new("GET", "/index.html");
        request.add_header(("Host", "amazon.com"));
        let mut encoder = RequestEncoder::from_request(request).unwrap();

        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"GET /index.html HTTP/1.1\r\nHost: amazon.com\r\n\r\n");
    }

    #[test]
    fn every_buffer_size_gives_the_same_bytes() {
        let expected = drive_with(&mut RequestEncoder::from_request(put_request(b"write more tests", &[])).unwrap(), 4096);

        for size in 1..=expected.len() + 1 {
            let mut encoder = RequestEncoder::from_request(put_request(b"write more tests", &[])).unwrap();
            assert_eq!(drive_with(&mut encoder, size), expected, "buffer size {size}");
        }
    }

    #[test]
    fn state_moves_from_head_to_body() {
        let mut encoder = RequestEncoder::from_request(put_request(b"abc", &[])).unwrap();
        let head_len = encoder.plan().header_block().len();

        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut (&mut dst).limit(head_len - 1)).unwrap(), EncodeStatus::Incomplete);
        assert_eq!(encoder.state(), EncoderState::Head);

        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut (&mut dst).limit(2)).unwrap(), EncodeStatus::Incomplete);
        assert_eq!(&dst[..], b"\na");
        assert_eq!(encoder.state(), EncoderState::Body);

        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"bc");
    }

    #[test]
    fn short_body_fails_after_head() {
        let _logging = LoggingHandle::for_tests();
        let request = put_request(b"write more", &[HeaderField::from_static("Content-Length", "16")]);
        let mut encoder = RequestEncoder::from_request(request).unwrap();

        let mut dst = BytesMut::new();
        let err = encoder.drive(&mut dst).unwrap_err();

        assert!(matches!(err, EncodeError::BodyStreamTooShort { content_length: 16, remaining: 6 }), "{err:?}");
        assert!(dst.starts_with(b"PUT / HTTP/1.1\r\n"));
        assert!(dst.ends_with(b"\r\n\r\nwrite more"));
        assert_eq!(encoder.state(), EncoderState::Failed);
        assert!(encoder.is_finished());
    }

    #[test]
    fn drive_after_done_is_misuse() {
        let _logging = LoggingHandle::for_tests();
        let mut encoder = RequestEncoder::from_request(OutgoingRequest::new("GET", "/")).unwrap();
        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut dst).unwrap(), EncodeStatus::Complete);

        let before = dst.len();
        let err = encoder.drive(&mut dst).unwrap_err();
        assert!(matches!(&err, EncodeError::Io { source } if source.kind() == ErrorKind::InvalidInput), "{err:?}");
        assert_eq!(dst.len(), before);
    }

    #[test]
    fn chunked_request_waits_for_chunks() {
        let _logging = LoggingHandle::for_tests();
        let mut encoder = RequestEncoder::from_request(chunked_request()).unwrap();

        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut dst).unwrap(), EncodeStatus::WaitingForChunks);
        assert_eq!(encoder.state(), EncoderState::Chunk);
        assert!(dst.ends_with(b"Transfer-Encoding: chunked\r\n\r\n"));

        encoder.enqueue_chunk("write more tests").unwrap();
        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut dst).unwrap(), EncodeStatus::WaitingForChunks);
        assert_eq!(&dst[..], b"10\r\nwrite more tests\r\n");

        encoder.mark_no_more_chunks(None).unwrap();
        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"0\r\n\r\n");

        let err = encoder.enqueue_chunk("late").unwrap_err();
        assert!(matches!(err, EncodeError::ChunkQueueClosed), "{err:?}");
    }

    #[test]
    fn chunked_output_parses_back() {
        let mut encoder = RequestEncoder::from_request(chunked_request()).unwrap();
        encoder.enqueue_chunk("hello ").unwrap();
        encoder.enqueue_chunk(Chunk::new("")).unwrap();
        encoder.enqueue_chunk(Chunk::new("world").with_extension("ext", Some("1"))).unwrap();
        encoder.mark_no_more_chunks(Some(vec![HeaderField::from_static("X-Checksum", "abc")])).unwrap();

        let wire = drive_with(&mut encoder, 7);

        let mut headers = [httparse::EMPTY_HEADER; 8];
        let mut request = httparse::Request::new(&mut headers);
        let httparse::Status::Complete(head_len) = request.parse(&wire).unwrap() else {
            panic!("incomplete head");
        };
        assert_eq!(request.method, Some("POST"));

        let mut rest = &wire[head_len..];
        let mut payload = Vec::new();
        loop {
            let httparse::Status::Complete((consumed, size)) = httparse::parse_chunk_size(rest).unwrap() else {
                panic!("incomplete chunk size");
            };
            rest = &rest[consumed..];
            if size == 0 {
                break;
            }
            let size = usize::try_from(size).unwrap();
            payload.extend_from_slice(&rest[..size]);
            assert_eq!(&rest[size..size + 2], b"\r\n");
            rest = &rest[size + 2..];
        }

        assert_eq!(payload, b"hello world");
        assert_eq!(rest, b"X-Checksum: abc\r\n\r\n");
    }

    #[test]
    fn completion_callback_runs_once_written() {
        let written = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&written);

        let mut encoder = RequestEncoder::from_request(chunked_request()).unwrap();
        encoder.enqueue_chunk(Chunk::new("payload").on_complete(move || flag.store(true, Ordering::SeqCst))).unwrap();
        encoder.mark_no_more_chunks(None).unwrap();

        let head_len = encoder.plan().header_block().len();
        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut (&mut dst).limit(head_len + 3)).unwrap(), EncodeStatus::Incomplete);
        assert!(!written.load(Ordering::SeqCst));

        let mut dst = BytesMut::new();
        assert_eq!(encoder.drive(&mut dst).unwrap(), EncodeStatus::Complete);
        assert!(written.load(Ordering::SeqCst));
    }

    #[test]
    fn fixed_length_request_has_no_chunk_queue() {
        let mut encoder = RequestEncoder::from_request(put_request(b"abc", &[])).unwrap();
        assert!(encoder.chunk_queue_mut().is_none());

        let err = encoder.enqueue_chunk("abc").unwrap_err();
        assert!(matches!(err, EncodeError::ChunkQueueClosed), "{err:?}");
        let err = encoder.mark_no_more_chunks(None).unwrap_err();
        assert!(matches!(err, EncodeError::ChunkQueueClosed), "{err:?}");
    }

    #[test]
    fn invalid_request_is_rejected_before_encoding() {
        let err = RequestEncoder::from_request(OutgoingRequest::new("G@T", "/")).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidMethod), "{err:?}");
    }

    #[test]
    fn config_bounds_body_reads() {
        let mut request = OutgoingRequest::new("PUT", "/");
        request.add_header(("Content-Length", "6"));
        request.set_body(ReaderBody::new(&b"abcdef"[..]));

        let config = EncoderConfig::new().body_read_buffer_size(2);
        let mut encoder = RequestEncoder::with_config(request, &config).unwrap();
        let wire = drive_with(&mut encoder, 64);
        assert!(wire.ends_with(b"\r\n\r\nabcdef"));
    }

    #[test]
    fn new_from_prebuilt_plan() {
        let request = put_request(b"abc", &[]);
        let plan = build_plan(&request).unwrap();
        let body: BoxBody = Box::new(Bytes::from_static(b"abc"));

        let mut encoder = RequestEncoder::new(plan, Some(body));
        let wire = drive_with(&mut encoder, 64);
        assert_eq!(&wire[..], &b"PUT / HTTP/1.1\r\nHost: amazon.com\r\nContent-Length: 3\r\n\r\nabc"[..]);
    }
}
