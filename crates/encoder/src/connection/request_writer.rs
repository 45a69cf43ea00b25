use crate::codec::{EncoderConfig, RequestEncoder};
use crate::protocol::{EncodeError, EncodeStatus};
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Drives a [`RequestEncoder`] into an [`AsyncWrite`] through one bounded buffer.
#[derive(Debug)]
pub struct RequestWriter<W> {
    writer: W,
    buffer: BytesMut,
    buffer_size: usize,
}

impl<W> RequestWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W, config: &EncoderConfig) -> Self {
        Self::with_capacity(writer, config.get_write_buffer_size())
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(1);
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), buffer_size }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes everything the encoder can currently produce.
    ///
    /// Returns [`EncodeStatus::Complete`] once the message is fully written, or
    /// [`EncodeStatus::WaitingForChunks`] when a chunked body needs more chunks; call
    /// again after enqueueing them. Written bytes are flushed before returning.
    ///
    /// # Errors
    ///
    /// Encoder errors, plus [`EncodeError::Io`] when the underlying writer fails.
    pub async fn write(&mut self, encoder: &mut RequestEncoder) -> Result<EncodeStatus, EncodeError> {
        loop {
            self.buffer.clear();
            let status = encoder.drive(&mut (&mut self.buffer).limit(self.buffer_size))?;

            if !self.buffer.is_empty() {
                trace!(bytes = self.buffer.len(), ?status, "write request bytes");
                self.writer.write_all(&self.buffer).await?;
            }

            if status != EncodeStatus::Incomplete {
                self.flush().await?;
                return Ok(status);
            }
        }
    }

    #[inline]
    pub async fn flush(&mut self) -> Result<(), EncodeError> {
        Ok(self.writer.flush().await?)
    }
}
