//! Async transport adapter
//!
//! The encoder itself never performs I/O. [`RequestWriter`] is the glue for callers
//! that hold a `tokio` [`AsyncWrite`](tokio::io::AsyncWrite): it drives one
//! [`RequestEncoder`](crate::codec::RequestEncoder) into a bounded buffer and writes
//! each filled buffer out until the request is complete or waits for more chunks.

mod request_writer;

pub use request_writer::RequestWriter;
