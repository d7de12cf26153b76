//! Capabilities of byte sources.
//!
//! Every source of bytes in this crate is a [`Read`]. What differs is whether
//! it can also reposition itself and serve reads at arbitrary offsets. The
//! [`ByteSource`] trait answers that question once, when a
//! [`SeekBuffer`](crate::SeekBuffer) is built, by either handing back a
//! random-access view of the source or giving the source back untouched.
//!
//! ```rust
//! use std::io::Cursor;
//! use seekio::{ByteSource, Forward};
//!
//! // Already seekable, passes straight through.
//! assert!(Cursor::new(b"abc".to_vec()).into_seekable().is_ok());
//!
//! // Forward-only, must be buffered.
//! assert!(Forward::new(&b"abc"[..]).into_seekable().is_err());
//! ```

use std::cmp;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::close::Close;
use crate::common::check_offset;

/// Reads at an absolute offset without moving the stream position.
///
/// Takes `&mut self` because a caching implementation has to record what it
/// pulls from its source, even though the visible cursor stays put.
pub trait ReadAt {
    /// Reads into `buf` starting at `offset`, returning how many bytes were
    /// read. Returns `Ok(0)` when `offset` is at or past the end of the data.
    ///
    /// Offsets are signed 64 bit stream positions. An offset above
    /// `i64::MAX` (for example `-1i64 as u64`) fails with
    /// [`CacheError::InvalidOffset`](crate::CacheError::InvalidOffset).
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Reads exactly `buf.len()` bytes starting at `offset`.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] if the data ends first.
    fn read_exact_at(&mut self, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
        while !buf.is_empty() {
            match self.read_at(buf, offset)? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "failed to fill whole buffer",
                    ))
                }
                n => {
                    let tmp = buf;
                    buf = &mut tmp[n..];
                    offset += n as u64;
                }
            }
        }
        Ok(())
    }
}

impl<T: ReadAt + ?Sized> ReadAt for &mut T {
    #[inline]
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }
}

impl<T: ReadAt + ?Sized> ReadAt for Box<T> {
    #[inline]
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }
}

/// Sequential read, read-at-offset and seek combined.
pub trait ReadSeekAt: Read + Seek + ReadAt {}

impl<T: Read + Seek + ReadAt + ?Sized> ReadSeekAt for T {}

/// A [`Read`] that knows whether it is natively random-access.
pub trait ByteSource: Read + Sized {
    /// The random-access form of this source. Forward-only sources use
    /// [`Unseekable`].
    type Seekable: Read + Seek + ReadAt;

    /// Returns the random-access form of the source, or the source itself if
    /// it can only be read forward.
    fn into_seekable(self) -> Result<Self::Seekable, Self>;
}

/// The random-access form of a source that has none. Cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unseekable {}

impl Read for Unseekable {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        match *self {}
    }
}

impl Seek for Unseekable {
    fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
        match *self {}
    }
}

impl ReadAt for Unseekable {
    fn read_at(&mut self, _: &mut [u8], _: u64) -> io::Result<usize> {
        match *self {}
    }
}

impl Close for Unseekable {
    fn close(&mut self) -> io::Result<()> {
        match *self {}
    }
}

/// Treats any reader as forward-only, even one that could seek.
#[derive(Debug, Clone)]
pub struct Forward<R>(R);

impl<R> Forward<R> {
    /// Wraps `inner`.
    #[inline]
    pub fn new(inner: R) -> Self {
        Forward(inner)
    }

    /// Returns a reference to the inner reader.
    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.0
    }

    /// Returns the inner reader.
    #[inline]
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read> Read for Forward<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read> ByteSource for Forward<R> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<R: Close> Close for Forward<R> {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        self.0.close()
    }
}

impl<T: AsRef<[u8]>> ReadAt for Cursor<T> {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let offset = check_offset(offset)?;
        let data = self.get_ref().as_ref();
        let start = match usize::try_from(offset) {
            Ok(start) if start < data.len() => start,
            _ => return Ok(0),
        };
        let amt = cmp::min(buf.len(), data.len() - start);
        buf[..amt].copy_from_slice(&data[start..start + amt]);
        Ok(amt)
    }
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    type Seekable = Self;

    #[inline]
    fn into_seekable(self) -> Result<Self, Self> {
        Ok(self)
    }
}

#[cfg(unix)]
impl ReadAt for std::fs::File {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let offset = check_offset(offset)?;
        std::os::unix::fs::FileExt::read_at(&*self, buf, offset)
    }
}

#[cfg(unix)]
impl ByteSource for std::fs::File {
    type Seekable = Self;

    #[inline]
    fn into_seekable(self) -> Result<Self, Self> {
        Ok(self)
    }
}

/// Implements [`ByteSource`] for readers that can only move forward.
macro_rules! impl_forward_source {
    ($($type:ty),+ $(,)?) => {
        $(
            impl ByteSource for $type {
                type Seekable = Unseekable;

                #[inline]
                fn into_seekable(self) -> Result<Unseekable, Self> {
                    Err(self)
                }
            }
        )+
    };
}

impl_forward_source!(
    io::Stdin,
    io::Empty,
    std::net::TcpStream,
    std::process::ChildStdout,
    std::process::ChildStderr,
);

#[cfg(not(unix))]
impl_forward_source!(std::fs::File);

impl ByteSource for &[u8] {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<'a> ByteSource for Box<dyn Read + Send + 'a> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<'a> ByteSource for Box<dyn Read + 'a> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

/// Borrowing a reader never grants random access, even when the reader
/// itself has it.
impl<R: Read + ?Sized> ByteSource for &mut R {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<A: Read, B: Read> ByteSource for io::Chain<A, B> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<R: Read> ByteSource for io::Take<R> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<R: Read> ByteSource for io::BufReader<R> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}
