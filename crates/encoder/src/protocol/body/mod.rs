//! Request body sources for fixed-length framing.
//!
//! A body is anything that can be read sequentially and may know its total length up
//! front. The encoder never type-switches on the concrete body kind; it only uses the
//! [`BodySource`] capability:
//!
//! - [`BodySource::known_length`] lets the validator derive a `Content-Length` when the
//!   application did not set one
//! - [`BodySource::read`] is pulled by the length encoder, bounded by the space left in
//!   the caller's output buffer
//!
//! # Implementations
//!
//! - `Bytes` and `std::io::Cursor` for in-memory payloads
//! - [`ReaderBody`] for any `std::io::Read`, with or without a known length
//!
//! Chunked bodies do not go through this module; they are fed through a
//! [`ChunkQueue`](crate::protocol::ChunkQueue) instead.

mod reader;
mod source;

pub use reader::ReaderBody;
pub use source::BodySource;
pub use source::BoxBody;
