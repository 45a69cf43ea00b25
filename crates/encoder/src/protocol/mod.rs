//! Core protocol types shared by the validator and the encoders.
//!
//! # Architecture
//!
//! - **Request Description** ([`request`], [`header`]): what the application wants to send
//!   - [`OutgoingRequest`]: method, request-target, header list and optional body source
//!   - [`HeaderField`]: a single header line, casing and order preserved
//!
//! - **Body Sources** ([`body`]): fixed-length bodies
//!   - [`body::BodySource`]: the capability the length encoder pulls from
//!
//! - **Chunk Queue** ([`chunk`]): chunked bodies
//!   - [`Chunk`]: data plus optional extensions and completion callback
//!   - [`ChunkQueue`]: FIFO plus the terminal marker carrying trailers
//!
//! - **Message Types** ([`message`]): framing and progress
//!   - [`PayloadSize`]: the body framing picked for a request
//!   - [`EncodeStatus`]: the result of one drive step
//!
//! - **Error Handling** ([`error`])
//!   - [`EncodeError`]: validation and encoding errors

mod message;
pub use message::EncodeStatus;
pub use message::PayloadSize;

mod header;
pub use header::HeaderField;
pub(crate) use header::{is_request_target, is_token, list_elements};

mod request;
pub use request::OutgoingRequest;

mod chunk;
pub use chunk::Chunk;
pub use chunk::ChunkExtension;
pub use chunk::ChunkQueue;

mod error;
pub use error::EncodeError;

pub mod body;
