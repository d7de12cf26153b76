//! Seekable views over forward-only readers.
//!
//! [`SeekBuffer`] is the entry point. Given a source that is already
//! random-access it passes every call straight through, otherwise it wraps
//! the source in a [`SeekCache`], which keeps every byte pulled so that any
//! offset seen once can be revisited.
//!
//! # Example
//! ```rust
//! use std::io::{Read, Seek, SeekFrom};
//! use seekio::{ReadAt, SeekBuffer};
//!
//! let source = &b"abcdefghijklmnopqrstuvwxyz"[..];
//! let mut buffer = SeekBuffer::new(source, 16);
//! assert!(!buffer.is_direct());
//!
//! let mut two = [0u8; 2];
//! buffer.seek(SeekFrom::Start(5))?;
//! buffer.read_exact(&mut two)?;
//! assert_eq!(&two, b"fg");
//!
//! buffer.read_exact_at(&mut two, 16)?;
//! assert_eq!(&two, b"qr");
//!
//! assert_eq!(buffer.seek(SeekFrom::End(-5))?, 21);
//! buffer.read_exact(&mut two)?;
//! assert_eq!(&two, b"vw");
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use crate::close::{with_close, Close, WithClose};
use crate::common::{assert_error_traits, check_offset, event, offset_by};
use crate::source::{ByteSource, ReadAt};

mod cache;
mod config;
mod whence;

pub use cache::SeekCache;
pub use config::CacheConfig;
pub use whence::{seek_raw, Whence};

/// Errors raised by seekable views themselves, as opposed to errors from the
/// source, which are passed on untouched.
///
/// At the [`Read`]/[`Seek`] boundary these travel inside an [`io::Error`];
/// use [`CacheError::find`] to get them back out.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An offset was negative or does not fit a signed 64 bit position.
    #[error("Offset {offset} is negative or out of range")]
    InvalidOffset { offset: i128 },
    /// A raw seek origin code was not 0, 1 or 2.
    #[error("Unrecognized seek origin {0}, expected 0 (start), 1 (current) or 2 (end)")]
    InvalidWhence(i32),
    /// The source ended before a seek target could be reached. The position
    /// was left at `reached`, the end of the data.
    #[error("Source ended at offset {reached} before reaching offset {target}")]
    SourceExhausted { target: u64, reached: u64 },
}
assert_error_traits!(CacheError);

impl CacheError {
    /// The [`io::ErrorKind`] used when this error crosses an `io` boundary.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            CacheError::InvalidOffset { .. } | CacheError::InvalidWhence(_) => {
                io::ErrorKind::InvalidInput
            }
            CacheError::SourceExhausted { .. } => io::ErrorKind::UnexpectedEof,
        }
    }

    /// Finds the `CacheError` carried by `err`, if any.
    pub fn find(err: &io::Error) -> Option<&CacheError> {
        err.get_ref()?.downcast_ref()
    }
}

impl From<CacheError> for io::Error {
    fn from(err: CacheError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

/// A seekable, random-access view over any [`ByteSource`].
///
/// Which variant is used is decided once, in the constructor: sources that
/// are natively random-access are used directly, everything else is cached.
/// Both variants behave identically from the outside.
pub enum SeekBuffer<R: ByteSource> {
    /// The source could already seek and read at offsets.
    Direct(R::Seekable),
    /// The source is forward-only and is being cached.
    Cached(SeekCache<R>),
}

impl<R: ByteSource> SeekBuffer<R> {
    /// Builds a view over `source`. `capacity` is the initial size of the
    /// cache buffer, if one is needed.
    ///
    /// Any reader can be used through `&mut reader` or by wrapping it in
    /// [`Forward`](crate::Forward), which also hides seekability from a
    /// reader that would otherwise be used directly.
    pub fn new(source: R, capacity: usize) -> Self {
        Self::with_config(
            source,
            CacheConfig::default().with_initial_capacity(capacity),
        )
    }

    /// Builds a view over `source`, configuring the cache if one is needed.
    pub fn with_config(source: R, config: CacheConfig) -> Self {
        match source.into_seekable() {
            Ok(seekable) => SeekBuffer::Direct(seekable),
            Err(source) => SeekBuffer::Cached(SeekCache::with_config(source, config)),
        }
    }

    /// Whether calls go straight to the source without caching.
    #[inline]
    pub fn is_direct(&self) -> bool {
        matches!(self, SeekBuffer::Direct(_))
    }

    /// The cache, when the source is being cached.
    #[inline]
    pub fn as_cache(&self) -> Option<&SeekCache<R>> {
        match self {
            SeekBuffer::Direct(_) => None,
            SeekBuffer::Cached(cache) => Some(cache),
        }
    }

    /// Attaches `close` to this view. It runs instead of closing the source.
    pub fn with_close<F>(self, close: F) -> WithClose<Self>
    where
        F: FnOnce() -> io::Result<()> + Send + 'static,
    {
        with_close(self, close)
    }
}

impl<R: ByteSource> fmt::Debug for SeekBuffer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekBuffer::Direct(_) => f.write_str("SeekBuffer::Direct"),
            SeekBuffer::Cached(cache) => f.debug_tuple("SeekBuffer::Cached").field(cache).finish(),
        }
    }
}

impl<R: ByteSource> Read for SeekBuffer<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SeekBuffer::Direct(inner) => inner.read(buf),
            SeekBuffer::Cached(cache) => cache.read(buf),
        }
    }
}

impl<R: ByteSource> Seek for SeekBuffer<R> {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            SeekBuffer::Direct(inner) => seek_direct(inner, pos),
            SeekBuffer::Cached(cache) => cache.seek(pos),
        }
    }
}

/// Seeks a natively seekable source with the same bounds the cache enforces.
///
/// Most seekable readers accept positions past their end. Here such a target
/// fails with [`CacheError::SourceExhausted`] and leaves the source at its
/// end, and a target before the start fails with
/// [`CacheError::InvalidOffset`] without moving it.
fn seek_direct<S: Seek>(inner: &mut S, pos: SeekFrom) -> io::Result<u64> {
    let position = inner.stream_position()?;
    let end = inner.seek(SeekFrom::End(0))?;
    let target = match pos {
        SeekFrom::Start(offset) => check_offset(offset),
        SeekFrom::Current(delta) => offset_by(position, delta),
        SeekFrom::End(delta) => offset_by(end, delta),
    };
    let target = match target {
        Ok(target) => target,
        Err(err) => {
            inner.seek(SeekFrom::Start(position))?;
            return Err(err.into());
        }
    };
    if target > end {
        event!(debug, wanted = target, reached = end, "seek target lies past end of data");
        return Err(CacheError::SourceExhausted {
            target,
            reached: end,
        }
        .into());
    }
    inner.seek(SeekFrom::Start(target))
}

impl<R: ByteSource> ReadAt for SeekBuffer<R> {
    #[inline]
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        match self {
            SeekBuffer::Direct(inner) => inner.read_at(buf, offset),
            SeekBuffer::Cached(cache) => cache.read_at(buf, offset),
        }
    }
}

impl<R: ByteSource> ByteSource for SeekBuffer<R> {
    type Seekable = Self;

    #[inline]
    fn into_seekable(self) -> Result<Self, Self> {
        Ok(self)
    }
}

impl<R> Close for SeekBuffer<R>
where
    R: ByteSource + Close,
    R::Seekable: Close,
{
    /// Closes the source without touching the cached bytes or the position.
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        match self {
            SeekBuffer::Direct(inner) => inner.close(),
            SeekBuffer::Cached(cache) => cache.close(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::source::Forward;

    #[test]
    fn seekable_source_is_used_directly() {
        let buffer = SeekBuffer::new(Cursor::new(b"abc".to_vec()), 8);
        assert!(buffer.is_direct());
        assert!(buffer.as_cache().is_none());
    }

    #[test]
    fn forward_source_is_cached() {
        let buffer = SeekBuffer::new(Forward::new(Cursor::new(b"abc".to_vec())), 8);
        assert!(!buffer.is_direct());
        assert_eq!(buffer.as_cache().map(SeekCache::position), Some(0));
    }

    #[test]
    fn rewrapping_passes_through() {
        let inner = SeekBuffer::new(&b"abcdef"[..], 8);
        let mut outer = SeekBuffer::new(inner, 8);
        assert!(outer.is_direct());

        let mut buf = [0u8; 3];
        outer.seek(SeekFrom::Start(2)).unwrap();
        outer.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"cde");
    }

    #[test]
    fn error_kinds() {
        let err = io::Error::from(CacheError::SourceExhausted {
            target: 10,
            reached: 4,
        });
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(
            err.to_string(),
            "Source ended at offset 4 before reaching offset 10"
        );
        assert_eq!(
            io::Error::from(CacheError::InvalidWhence(9)).kind(),
            io::ErrorKind::InvalidInput
        );
        assert!(CacheError::find(&io::Error::other("plain")).is_none());
    }
}
