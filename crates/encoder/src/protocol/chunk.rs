//! Application-fed chunk queue for `Transfer-Encoding: chunked` bodies.
//!
//! The application appends [`Chunk`]s as data becomes available and finally marks the
//! queue as closed, optionally handing over trailer fields. Ownership of a chunk moves
//! into the queue on [`ChunkQueue::enqueue`] and out of it when the chunked encoder
//! pops it; the chunk is dropped once its bytes have been copied to an output buffer.
//!
//! The queue itself is not synchronized. Producers running on another thread must
//! guard the encoder that owns it with their own lock.

use std::collections::VecDeque;
use std::fmt;

use bytes::Bytes;
use tracing::trace;

use crate::ensure;
use crate::protocol::header::{is_token, HeaderField};
use crate::protocol::EncodeError;

/// Trailer fields that would change framing, routing or request semantics if they
/// were accepted after the body, see RFC 9110 section 6.5.1.
const FORBIDDEN_TRAILERS: &[&str] = &[
    "transfer-encoding",
    "content-length",
    "host",
    "content-type",
    "content-encoding",
    "content-range",
    "trailer",
    "te",
    "expect",
    "max-forwards",
    "authorization",
    "set-cookie",
    "cache-control",
];

type CompletionFn = Box<dyn FnOnce() + Send>;

/// A `;name[=value]` chunk extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkExtension {
    name: Bytes,
    value: Option<Bytes>,
}

impl ChunkExtension {
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Length of `;name[=value]` once rendered.
    pub(crate) fn encoded_len(&self) -> usize {
        1 + self.name.len() + self.value.as_ref().map_or(0, |v| 1 + v.len())
    }
}

/// One piece of a chunked body.
pub struct Chunk {
    data: Bytes,
    extensions: Vec<ChunkExtension>,
    on_complete: Option<CompletionFn>,
}

impl Chunk {
    pub fn new<D: Into<Bytes>>(data: D) -> Self {
        Self { data: data.into(), extensions: Vec::new(), on_complete: None }
    }

    /// Adds a chunk extension. A `None` value renders as a bare `;name`.
    pub fn with_extension<N, V>(mut self, name: N, value: Option<V>) -> Self
    where
        N: Into<Bytes>,
        V: Into<Bytes>,
    {
        self.extensions.push(ChunkExtension { name: name.into(), value: value.map(Into::into) });
        self
    }

    /// Registers a callback that runs once the chunk's data was copied into an output buffer.
    ///
    /// The callback does not run if the encoder is dropped before reaching the chunk.
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn extensions(&self) -> &[ChunkExtension] {
        &self.extensions
    }

    pub(crate) fn data_mut(&mut self) -> &mut Bytes {
        &mut self.data
    }

    /// Consumes the chunk, firing its completion callback.
    pub(crate) fn complete(mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }

    fn validate(&self) -> Result<(), EncodeError> {
        for extension in &self.extensions {
            ensure!(
                is_token(&extension.name),
                EncodeError::invalid_chunk_extension(format!(
                    "name {:?} is not a token",
                    String::from_utf8_lossy(&extension.name)
                ))
            );
            if let Some(value) = &extension.value {
                ensure!(
                    is_token(value),
                    EncodeError::invalid_chunk_extension(format!(
                        "value {:?} is not a token",
                        String::from_utf8_lossy(value)
                    ))
                );
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("len", &self.data.len())
            .field("extensions", &self.extensions)
            .field("has_on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl From<Bytes> for Chunk {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<&'static [u8]> for Chunk {
    fn from(data: &'static [u8]) -> Self {
        Self::new(data)
    }
}

impl From<&'static str> for Chunk {
    fn from(data: &'static str) -> Self {
        Self::new(data)
    }
}

/// FIFO of chunks plus the terminal "no more chunks" marker.
#[derive(Debug, Default)]
pub struct ChunkQueue {
    chunks: VecDeque<Chunk>,
    closed: bool,
    trailers: Vec<HeaderField>,
}

impl ChunkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk to the back of the queue.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::ChunkQueueClosed`] once [`ChunkQueue::mark_no_more_chunks`] was called
    /// - [`EncodeError::InvalidChunkExtension`] if an extension name or value is not a token
    pub fn enqueue<C: Into<Chunk>>(&mut self, chunk: C) -> Result<(), EncodeError> {
        ensure!(!self.closed, EncodeError::ChunkQueueClosed);
        let chunk = chunk.into();
        chunk.validate()?;
        trace!(len = chunk.len(), queued = self.chunks.len(), "enqueue chunk");
        self.chunks.push_back(chunk);
        Ok(())
    }

    /// Closes the queue. Chunks already queued are still sent, followed by the last
    /// chunk, the trailer fields and the final CRLF.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::ChunkQueueClosed`] if the queue was already closed
    /// - [`EncodeError::InvalidHeaderName`] / [`EncodeError::InvalidHeaderValue`] for malformed trailers
    /// - [`EncodeError::InvalidHeaderField`] for fields not allowed in a trailer section
    ///
    /// On error the queue stays open.
    pub fn mark_no_more_chunks(&mut self, trailers: Option<Vec<HeaderField>>) -> Result<(), EncodeError> {
        ensure!(!self.closed, EncodeError::ChunkQueueClosed);
        let trailers = trailers.unwrap_or_default();
        validate_trailers(&trailers)?;
        trace!(queued = self.chunks.len(), trailers = trailers.len(), "no more chunks");
        self.trailers = trailers;
        self.closed = true;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns true once the terminal marker was appended.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn pop_front(&mut self) -> Option<Chunk> {
        self.chunks.pop_front()
    }

    pub(crate) fn take_trailers(&mut self) -> Vec<HeaderField> {
        std::mem::take(&mut self.trailers)
    }
}

fn validate_trailers(trailers: &[HeaderField]) -> Result<(), EncodeError> {
    for field in trailers {
        field.validate()?;
        ensure!(
            !FORBIDDEN_TRAILERS.iter().any(|name| field.is(name)),
            EncodeError::invalid_header_field(format!(
                "{} is not allowed in trailers",
                String::from_utf8_lossy(field.name())
            ))
        );
    }
    Ok(())
}
