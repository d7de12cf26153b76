//! Attaching close behaviour to readers.
//!
//! Rust releases resources on drop, but some sources need an explicit,
//! fallible shutdown step (flushing a remote session, reaping a child
//! process). [`Close`] names that step and [`WithClose`] attaches it to any
//! value.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::source::{ByteSource, ReadAt, Unseekable};

/// A resource with an explicit, fallible shutdown step.
pub trait Close {
    /// Shuts the resource down. Calling it again after success must be
    /// harmless.
    fn close(&mut self) -> io::Result<()>;
}

impl<T: Close + ?Sized> Close for &mut T {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T: Close + ?Sized> Close for Box<T> {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Sequential read, seek and close combined.
pub trait ReadSeekClose: Read + Seek + Close {}

impl<T: Read + Seek + Close + ?Sized> ReadSeekClose for T {}

/// Function run by [`WithClose::close`].
pub type CloseFn = Box<dyn FnOnce() -> io::Result<()> + Send>;

/// Pairs a value with a close function, which runs at most once.
pub struct WithClose<R> {
    inner: R,
    close: Option<CloseFn>,
}

/// Wraps `inner` so that closing it runs `close`.
pub fn with_close<R, F>(inner: R, close: F) -> WithClose<R>
where
    F: FnOnce() -> io::Result<()> + Send + 'static,
{
    WithClose {
        inner,
        close: Some(Box::new(close)),
    }
}

/// Wraps `inner` with a close function that does nothing.
pub fn nop_close<R>(inner: R) -> WithClose<R> {
    WithClose { inner, close: None }
}

impl<R> WithClose<R> {
    /// Returns a reference to the inner value.
    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the inner value.
    #[inline]
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Returns the inner value. The close function is dropped without
    /// running.
    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Whether the close function has already run (or there never was one).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.close.is_none()
    }
}

impl<R: fmt::Debug> fmt::Debug for WithClose<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithClose")
            .field("inner", &self.inner)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<R> Close for WithClose<R> {
    fn close(&mut self) -> io::Result<()> {
        match self.close.take() {
            Some(close) => close(),
            None => Ok(()),
        }
    }
}

impl<R: Read> Read for WithClose<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for WithClose<R> {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<R: ReadAt> ReadAt for WithClose<R> {
    #[inline]
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.inner.read_at(buf, offset)
    }
}

impl<R: Write> Write for WithClose<R> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<R: Read> ByteSource for WithClose<R> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}
