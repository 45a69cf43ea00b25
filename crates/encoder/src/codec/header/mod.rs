//! HTTP header processing module for encoding request heads
//!
//! # Components
//!
//! - [`HeaderEncoder`]: Encodes the request line and header fields to bytes
//!   - Implements standard HTTP/1.1 request line formatting
//!   - Writes header fields verbatim, order and casing preserved
//!   - Appends a derived `Content-Length` when the body length came from the body source

mod header_encoder;

pub use header_encoder::HeaderEncoder;
pub use header_encoder::RequestHead;
pub(crate) use header_encoder::{encode_fields, FastWrite};
