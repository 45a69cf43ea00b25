//! A sans-io HTTP/1.1 request encoder
//!
//! This crate turns an application's description of an outgoing request into the exact
//! bytes of an HTTP/1.1 request message. It validates the request before emitting
//! anything, picks between fixed-length and chunked body framing, and then streams the
//! message into caller-owned bounded buffers, resuming where it stopped on every call.
//!
//! # Features
//!
//! - Strict validation of method, request-target, header names and values (no CR/LF injection)
//! - `Transfer-Encoding` coding list handling, with `chunked` as the final coding
//! - Fixed-length bodies pulled from a [`protocol::body::BodySource`]
//! - Chunked bodies fed incrementally through a chunk queue, with extensions and trailers
//! - Output split across buffers of any size, down to a single byte
//! - An async writer adapter for any `tokio` `AsyncWrite`
//!
//! # Example
//!
//! ```
//! use bytes::{Bytes, BytesMut};
//! use micro_http_encoder::codec::RequestEncoder;
//! use micro_http_encoder::protocol::{EncodeStatus, OutgoingRequest};
//!
//! let mut request = OutgoingRequest::new("PUT", "/");
//! request.add_header(("Host", "amazon.com"));
//! request.set_body(Bytes::from_static(b"write more tests"));
//!
//! let mut encoder = RequestEncoder::from_request(request).unwrap();
//! let mut wire = BytesMut::new();
//! assert_eq!(encoder.drive(&mut wire).unwrap(), EncodeStatus::Complete);
//! assert_eq!(&wire[..], &b"PUT / HTTP/1.1\r\nHost: amazon.com\r\nContent-Length: 16\r\n\r\nwrite more tests"[..]);
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request description, body sources, the chunk queue and [`protocol::EncodeError`]
//! - [`codec`]: validation ([`codec::build_plan`]) and the resumable [`codec::RequestEncoder`]
//! - [`connection`]: [`connection::RequestWriter`], driving an encoder into an `AsyncWrite`
//! - [`logging`]: explicit `tracing-subscriber` setup
//!
//! # Limitations
//!
//! - HTTP/1.1 requests only, no response parsing
//! - No content codings; `gzip` and friends are declared by the application, not applied
//! - No connection management or keep-alive policy

pub mod codec;
pub mod connection;
pub mod logging;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
