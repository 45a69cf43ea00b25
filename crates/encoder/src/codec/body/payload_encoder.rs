use crate::codec::body::chunked_encoder::ChunkedEncoder;
use crate::codec::body::length_encoder::LengthEncoder;
use crate::protocol::body::BoxBody;
use crate::protocol::{ChunkQueue, EncodeError, EncodeStatus, PayloadSize};
use bytes::BufMut;
use tracing::warn;

/// encode payload for request body
#[derive(Debug)]
pub struct PayloadEncoder {
    kind: Kind,
}

#[derive(Debug)]
enum Kind {
    /// content-length payload
    Length(LengthEncoder),

    /// transfer-encoding chunked payload
    Chunked(ChunkedEncoder),

    /// have no body with the request
    NoBody,
}

impl PayloadEncoder {
    /// create an empty `PayloadEncoder`
    pub fn empty() -> Self {
        Self { kind: Kind::NoBody }
    }

    /// create a chunked `PayloadEncoder`
    pub fn chunked() -> Self {
        Self { kind: Kind::Chunked(ChunkedEncoder::new()) }
    }

    /// create a fixed length `PayloadEncoder`
    pub fn fix_length(size: u64, source: Option<BoxBody>, read_buffer_size: usize) -> Self {
        Self { kind: Kind::Length(LengthEncoder::new(size, source, read_buffer_size)) }
    }

    /// Picks the encoder for `payload_size`; a body source is only kept for fixed-length framing.
    pub fn from_payload_size(payload_size: PayloadSize, source: Option<BoxBody>, read_buffer_size: usize) -> Self {
        match payload_size {
            PayloadSize::Length(size) => Self::fix_length(size, source, read_buffer_size),
            PayloadSize::Chunked => {
                if source.is_some() {
                    warn!("dropping body source of a chunked request");
                }
                Self::chunked()
            }
            PayloadSize::Empty => Self::empty(),
        }
    }

    pub fn is_chunked(&self) -> bool {
        matches!(self.kind, Kind::Chunked(_))
    }

    /// The chunk queue, only present for chunked payloads.
    pub fn chunk_queue_mut(&mut self) -> Option<&mut ChunkQueue> {
        match &mut self.kind {
            Kind::Chunked(encoder) => Some(encoder.queue_mut()),
            Kind::Length(_) | Kind::NoBody => None,
        }
    }

    pub fn encode<B: BufMut>(&mut self, dst: &mut B) -> Result<EncodeStatus, EncodeError> {
        match &mut self.kind {
            Kind::Length(encoder) => encoder.encode(dst),
            Kind::Chunked(encoder) => encoder.encode(dst),
            Kind::NoBody => Ok(EncodeStatus::Complete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Bytes, BytesMut};

    #[test]
    fn picks_encoder_from_payload_size() {
        let body: BoxBody = Box::new(Bytes::from_static(b"abc"));

        let mut encoder = PayloadEncoder::from_payload_size(PayloadSize::Length(3), Some(body), 16);
        assert!(!encoder.is_chunked());
        assert!(encoder.chunk_queue_mut().is_none());
        let mut dst = BytesMut::new();
        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Complete);
        assert_eq!(&dst[..], b"abc");

        let mut encoder = PayloadEncoder::from_payload_size(PayloadSize::Chunked, None, 16);
        assert!(encoder.is_chunked());
        assert!(encoder.chunk_queue_mut().is_some());
        assert_eq!(encoder.encode(&mut BytesMut::new()).unwrap(), EncodeStatus::WaitingForChunks);

        let mut encoder = PayloadEncoder::from_payload_size(PayloadSize::Empty, None, 16);
        assert!(!encoder.is_chunked());
        assert!(encoder.chunk_queue_mut().is_none());
        let mut dst = BytesMut::new();
        assert_eq!(encoder.encode(&mut dst).unwrap(), EncodeStatus::Complete);
        assert!(dst.is_empty());
    }
}
