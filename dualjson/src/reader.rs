// SPDX-License-Identifier: Apache-2.0

/// Trait for input sources that supply raw bytes to the parser.
///
/// Implement this for files, sockets, serial ports or any other byte stream.
/// The parser pulls from it one block at a time and never asks for more than
/// the free space left in the block being filled.
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    /// - A reader that wants to cancel a parse may return 0 early; the parser
    ///   treats that as ordinary end of input
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// A [`Reader`] over any [`std::io::Read`], such as a file or a TCP stream.
///
/// Interrupted reads are retried; any other I/O error ends the parse with
/// [`ErrorKind::ReaderError`](crate::ErrorKind::ReaderError).
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<T> {
    inner: T,
}

#[cfg(feature = "std")]
impl<T: std::io::Read> IoReader<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Read> Reader for IoReader<T> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}
