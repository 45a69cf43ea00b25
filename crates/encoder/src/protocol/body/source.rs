use std::io;
use std::io::{Cursor, Read};

use bytes::{Buf, Bytes};

/// A sequentially readable request body.
pub trait BodySource {
    /// Total number of bytes this source will yield from now on, if known.
    fn known_length(&self) -> Option<u64>;

    /// Reads up to `buf.len()` bytes into `buf`, returning how many were read.
    ///
    /// `Ok(0)` signals the end of the body. Errors of kind `Interrupted` are retried
    /// by the encoder, any other error aborts the message.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Owned, type-erased body source stored on an outgoing request.
pub type BoxBody = Box<dyn BodySource + Send>;

impl<T: BodySource + ?Sized> BodySource for Box<T> {
    #[inline]
    fn known_length(&self) -> Option<u64> {
        (**self).known_length()
    }

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }
}

impl BodySource for Bytes {
    fn known_length(&self) -> Option<u64> {
        Some(self.remaining() as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        self.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}

impl<T: AsRef<[u8]>> BodySource for Cursor<T> {
    fn known_length(&self) -> Option<u64> {
        let len = self.get_ref().as_ref().len() as u64;
        Some(len.saturating_sub(self.position()))
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }
}
