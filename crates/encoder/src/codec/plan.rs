use bytes::Bytes;

use crate::protocol::PayloadSize;

/// The validated, immutable description of how one request goes on the wire.
///
/// Built once by [`build_plan`](crate::codec::build_plan); the request encoder only
/// reads from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodePlan {
    pub(crate) method: Bytes,
    pub(crate) target: Bytes,
    pub(crate) has_chunked_encoding: bool,
    pub(crate) has_connection_close: bool,
    pub(crate) content_length: u64,
    pub(crate) header_block: Bytes,
}

impl EncodePlan {
    pub fn method(&self) -> &[u8] {
        &self.method
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// True iff the body is framed with `Transfer-Encoding: chunked`.
    pub fn has_chunked_encoding(&self) -> bool {
        self.has_chunked_encoding
    }

    /// True iff the request carries `Connection: close`.
    ///
    /// Framing does not depend on it; the transport uses it to decide on keep-alive.
    pub fn has_connection_close(&self) -> bool {
        self.has_connection_close
    }

    /// Number of body bytes for fixed-length framing, always 0 for chunked framing.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// The rendered request line and header block, terminated by an empty line.
    pub fn header_block(&self) -> &Bytes {
        &self.header_block
    }

    pub fn payload_size(&self) -> PayloadSize {
        if self.has_chunked_encoding { PayloadSize::Chunked } else { PayloadSize::from(self.content_length) }
    }
}
