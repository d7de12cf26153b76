//! Byte counting decorators.

use std::io::{self, Read, Write};

use crate::close::Close;
use crate::source::{ByteSource, Unseekable};

/// Counts the bytes yielded by the underlying reader.
#[derive(Debug, Clone)]
pub struct ReadCounter<R> {
    inner: R,
    read: u64,
}

impl<R> ReadCounter<R> {
    /// Wraps `inner` with a count starting at zero.
    #[inline]
    pub fn new(inner: R) -> Self {
        ReadCounter { inner, read: 0 }
    }

    /// Total number of bytes yielded by all reads so far.
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.read
    }

    /// Returns a reference to the inner reader.
    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the inner reader.
    ///
    /// Reading through it bypasses the count.
    #[inline]
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Returns the inner reader.
    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ReadCounter<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n as u64;
        Ok(n)
    }
}

impl<R: Read> ByteSource for ReadCounter<R> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<R: Close> Close for ReadCounter<R> {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

/// Counts the bytes accepted by the underlying writer.
#[derive(Debug, Clone)]
pub struct WriteCounter<W> {
    inner: W,
    written: u64,
}

impl<W> WriteCounter<W> {
    /// Wraps `inner` with a count starting at zero.
    #[inline]
    pub fn new(inner: W) -> Self {
        WriteCounter { inner, written: 0 }
    }

    /// Total number of bytes accepted by all writes so far.
    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Returns a reference to the inner writer.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the inner writer.
    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Returns the inner writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for WriteCounter<W> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Close> Close for WriteCounter<W> {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}
