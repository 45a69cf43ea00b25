//! HTTP/1.1 request encoding
//!
//! Encoding a request is split in two phases:
//!
//! - Validation: [`build_plan`] checks the request and picks its framing, producing an
//!   immutable [`EncodePlan`] with the rendered header block. A rejected request never
//!   produces any output.
//! - Streaming: [`RequestEncoder`] copies the header block and the body into caller
//!   supplied bounded buffers, resuming exactly where the previous call stopped.
//!
//! # Components
//!
//! - [`validator`]: [`build_plan`] / [`build_plan_with`]
//! - [`header`]: [`HeaderEncoder`], the `tokio_util` encoder for the request line and fields
//! - [`body`]: fixed-length and chunked body framing
//! - [`RequestEncoder`]: the per-request state machine
//! - [`EncoderConfig`]: limits and buffer sizes
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_http_encoder::codec::RequestEncoder;
//! use micro_http_encoder::protocol::{EncodeStatus, OutgoingRequest};
//!
//! let mut request = OutgoingRequest::new("POST", "/upload");
//! request.add_header(("Host", "example.com")).add_header(("Transfer-Encoding", "chunked"));
//!
//! let mut encoder = RequestEncoder::from_request(request).unwrap();
//! encoder.enqueue_chunk("hello").unwrap();
//! encoder.mark_no_more_chunks(None).unwrap();
//!
//! let mut wire = BytesMut::new();
//! assert_eq!(encoder.drive(&mut wire).unwrap(), EncodeStatus::Complete);
//! assert!(wire.ends_with(b"\r\n\r\n5\r\nhello\r\n0\r\n\r\n"));
//! ```

pub mod body;
mod config;
pub mod header;
mod plan;
mod request_encoder;
pub mod validator;

pub use config::{
    EncoderConfig, DEFAULT_BODY_READ_BUFFER_SIZE, DEFAULT_MAX_HEADER_BYTES, DEFAULT_MAX_HEADER_NUM,
    DEFAULT_WRITE_BUFFER_SIZE,
};
pub use header::{HeaderEncoder, RequestHead};
pub use plan::EncodePlan;
pub use request_encoder::{EncoderState, RequestEncoder};
pub use validator::{build_plan, build_plan_with};
