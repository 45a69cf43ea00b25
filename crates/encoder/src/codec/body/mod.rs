//! HTTP body framing for outgoing requests
//!
//! Each encoder writes into a caller-bounded [`bytes::BufMut`] and reports an
//! [`EncodeStatus`](crate::protocol::EncodeStatus), so a body can be spread over
//! any number of output buffers.
//!
//! # Components
//!
//! - [`LengthEncoder`]: copies exactly `Content-Length` bytes out of a body source
//! - [`ChunkedEncoder`]: frames queued chunks, then the last chunk and trailers
//! - [`PayloadEncoder`]: picks one of the above from the request's payload size
//!
//! refer: <https://www.rfc-editor.org/rfc/rfc9112.html#name-message-body-length>

mod chunked_encoder;
mod length_encoder;
mod payload_encoder;

pub use chunked_encoder::ChunkedEncoder;
pub use length_encoder::LengthEncoder;
pub use payload_encoder::PayloadEncoder;
