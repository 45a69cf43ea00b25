//! HTTP header encoder implementation for serializing HTTP request heads
//!
//! This module renders the request line and the header fields of an outgoing request
//! into raw bytes, following RFC 9112 section 3 and 5:
//!
//! ```text
//! METHOD SP request-target SP HTTP/1.1 CRLF
//! *( field-name ":" SP field-value CRLF )
//! CRLF
//! ```
//!
//! The encoder performs no validation, the input is expected to have passed the
//! validator already. Header fields are written verbatim, in their original order and
//! casing. The same line format is reused for the trailer section of chunked bodies.

use crate::protocol::{EncodeError, HeaderField};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

const CRLF: &[u8] = b"\r\n";
const VERSION: &[u8] = b"HTTP/1.1";

/// Borrowed view of everything that goes into a request head.
#[derive(Debug, Clone, Copy)]
pub struct RequestHead<'a> {
    pub method: &'a [u8],
    pub target: &'a [u8],
    pub headers: &'a [HeaderField],
    /// A `Content-Length` derived from the body source, appended after `headers`
    /// when the application did not declare one itself.
    pub content_length: Option<u64>,
}

impl<'a> RequestHead<'a> {
    pub fn new(method: &'a [u8], target: &'a [u8], headers: &'a [HeaderField]) -> Self {
        Self { method, target, headers, content_length: None }
    }

    /// Exact number of bytes this head occupies once encoded.
    pub fn encoded_len(&self) -> usize {
        let request_line = self.method.len() + 1 + self.target.len() + 1 + VERSION.len() + CRLF.len();
        let content_length = self.content_length.map_or(0, |n| b"Content-Length: ".len() + decimal_len(n) + CRLF.len());
        request_line + fields_len(self.headers) + content_length + CRLF.len()
    }
}

/// Encoder for HTTP request heads implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<RequestHead<'_>> for HeaderEncoder {
    type Error = EncodeError;

    /// Encodes the request line and header block into the provided bytes buffer.
    ///
    /// The buffer is reserved up front to the exact encoded size.
    fn encode(&mut self, head: RequestHead<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(head.encoded_len());

        dst.put_slice(head.method);
        dst.put_u8(b' ');
        dst.put_slice(head.target);
        dst.put_u8(b' ');
        dst.put_slice(VERSION);
        dst.put_slice(CRLF);

        encode_fields(head.headers, dst);

        if let Some(content_length) = head.content_length {
            write!(FastWrite(dst), "Content-Length: {content_length}\r\n")?;
        }

        dst.put_slice(CRLF);
        Ok(())
    }
}

/// Writes each field as `name: value\r\n`.
pub(crate) fn encode_fields(fields: &[HeaderField], dst: &mut BytesMut) {
    dst.reserve(fields_len(fields));
    for field in fields {
        dst.put_slice(field.name());
        dst.put_slice(b": ");
        dst.put_slice(field.value());
        dst.put_slice(CRLF);
    }
}

fn fields_len(fields: &[HeaderField]) -> usize {
    fields.iter().map(HeaderField::encoded_len).sum()
}

fn decimal_len(mut n: u64) -> usize {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format numbers straight into the buffer without an intermediate `String`.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
