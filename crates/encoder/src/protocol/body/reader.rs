use std::io;
use std::io::Read;

use crate::protocol::body::BodySource;

/// Adapts any [`std::io::Read`] into a [`BodySource`].
///
/// Without a declared length the request has to carry its own `Content-Length`
/// header, otherwise the body cannot be framed with a fixed length.
#[derive(Debug)]
pub struct ReaderBody<R> {
    reader: R,
    length: Option<u64>,
}

impl<R: Read> ReaderBody<R> {
    /// A reader of unknown length.
    pub fn new(reader: R) -> Self {
        Self { reader, length: None }
    }

    /// A reader that is declared to yield exactly `length` bytes.
    pub fn with_length(reader: R, length: u64) -> Self {
        Self { reader, length: Some(length) }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> BodySource for ReaderBody<R> {
    fn known_length(&self) -> Option<u64> {
        self.length
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if let Some(length) = self.length.as_mut() {
            *length = length.saturating_sub(n as u64);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_length_counts_down() {
        let mut body = ReaderBody::with_length(&b"hello"[..], 5);
        assert_eq!(body.known_length(), Some(5));

        let mut buf = [0u8; 3];
        assert_eq!(body.read(&mut buf).unwrap(), 3);
        assert_eq!(body.known_length(), Some(2));
    }

    #[test]
    fn unknown_length_stays_unknown() {
        let mut body = ReaderBody::new(&b"hello"[..]);
        assert_eq!(body.known_length(), None);

        let mut buf = [0u8; 8];
        assert_eq!(body.read(&mut buf).unwrap(), 5);
        assert_eq!(body.known_length(), None);
        assert_eq!(body.read(&mut buf).unwrap(), 0);
    }
}
