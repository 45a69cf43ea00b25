use crate::codec::header::{encode_fields, FastWrite};
use crate::protocol::{Chunk, ChunkQueue, EncodeError, EncodeStatus, HeaderField};
use crate::utils::write_some;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Write;
use tracing::trace;

const CRLF: &[u8] = b"\r\n";
const LAST_CHUNK: &[u8] = b"0\r\n";

/// Frames the chunks of a [`ChunkQueue`] with the chunked transfer coding.
///
/// refer: <https://www.rfc-editor.org/rfc/rfc9112.html#name-chunked-transfer-coding>
#[derive(Debug, Default)]
pub struct ChunkedEncoder {
    queue: ChunkQueue,
    state: ChunkedState,
    /// size line, data CRLF or last chunk + trailers, whichever is being written
    pending: Bytes,
    current: Option<Chunk>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ChunkedState {
    #[default]
    Next,
    SizeLine,
    Data,
    DataCrlf,
    Terminator,
    End,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_mut(&mut self) -> &mut ChunkQueue {
        &mut self.queue
    }

    pub fn encode<B: BufMut>(&mut self, dst: &mut B) -> Result<EncodeStatus, EncodeError> {
        loop {
            match self.state {
                ChunkedState::Next => match self.queue.pop_front() {
                    Some(chunk) if chunk.is_empty() => {
                        trace!("skip empty chunk");
                        chunk.complete();
                    }
                    Some(chunk) => {
                        self.pending = size_line(&chunk)?;
                        self.current = Some(chunk);
                        self.state = ChunkedState::SizeLine;
                    }
                    None if self.queue.is_closed() => {
                        self.pending = terminator(&self.queue.take_trailers());
                        self.state = ChunkedState::Terminator;
                    }
                    None => return Ok(EncodeStatus::WaitingForChunks),
                },

                ChunkedState::SizeLine => {
                    if !write_some(&mut self.pending, dst) {
                        return Ok(EncodeStatus::Incomplete);
                    }
                    self.state = ChunkedState::Data;
                }

                ChunkedState::Data => {
                    let drained = self.current.as_mut().is_none_or(|chunk| write_some(chunk.data_mut(), dst));
                    if !drained {
                        return Ok(EncodeStatus::Incomplete);
                    }
                    self.pending = Bytes::from_static(CRLF);
                    self.state = ChunkedState::DataCrlf;
                }

                ChunkedState::DataCrlf => {
                    if !write_some(&mut self.pending, dst) {
                        return Ok(EncodeStatus::Incomplete);
                    }
                    if let Some(chunk) = self.current.take() {
                        trace!(extensions = chunk.extensions().len(), "chunk written");
                        chunk.complete();
                    }
                    self.state = ChunkedState::Next;
                }

                ChunkedState::Terminator => {
                    if !write_some(&mut self.pending, dst) {
                        return Ok(EncodeStatus::Incomplete);
                    }
                    self.state = ChunkedState::End;
                }

                ChunkedState::End => return Ok(EncodeStatus::Complete),
            }
        }
    }
}

/// `chunk-size *( ";" name [ "=" value ] ) CRLF`, size in lowercase hex.
fn size_line(chunk: &Chunk) -> Result<Bytes, EncodeError> {
    let extensions_len: usize = chunk.extensions().iter().map(|extension| extension.encoded_len()).sum();
    let mut line = BytesMut::with_capacity(16 + extensions_len + CRLF.len());

    write!(FastWrite(&mut line), "{:x}", chunk.len())?;
    for extension in chunk.extensions() {
        line.put_u8(b';');
        line.put_slice(extension.name());
        if let Some(value) = extension.value() {
            line.put_u8(b'=');
            line.put_slice(value);
        }
    }
    line.put_slice(CRLF);
    Ok(line.freeze())
}

/// `last-chunk trailer-section CRLF`
fn terminator(trailers: &[HeaderField]) -> Bytes {
    let mut block = BytesMut::with_capacity(LAST_CHUNK.len() + CRLF.len());
    block.put_slice(LAST_CHUNK);
    encode_fields(trailers, &mut block);
    block.put_slice(CRLF);
    block.freeze()
}
