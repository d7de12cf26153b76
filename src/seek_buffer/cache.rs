use std::cmp;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use super::{CacheConfig, CacheError};
use crate::close::Close;
use crate::common::{check_offset, event, offset_by, to_index};
use crate::counter::ReadCounter;
use crate::source::{ByteSource, ReadAt};

/// Makes a forward-only reader seekable by keeping every byte it has produced.
///
/// Bytes are pulled from the source only when a read or seek needs data past
/// what is already buffered, and each byte is pulled exactly once. Seeking
/// backwards is served from memory. Seeking relative to the end reads the
/// source to completion, since its length is unknown until then.
///
/// The buffer only grows, so memory use is bounded by the furthest offset
/// that has been requested, not by the current position.
pub struct SeekCache<R> {
    source: ReadCounter<R>,
    /// Everything pulled from `source`, in order, starting at offset 0.
    buffer: Vec<u8>,
    /// Never greater than `buffer.len()`.
    position: u64,
    drain_chunk: usize,
    /// The source reported end of data. It will not be asked again.
    exhausted: bool,
    /// A source error that arrived after bytes were already handed out.
    held_error: Option<io::Error>,
}

impl<R> fmt::Debug for SeekCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeekCache")
            .field("position", &self.position)
            .field("buffered", &self.buffer.len())
            .field("exhausted", &self.exhausted)
            .field("held_error", &self.held_error)
            .finish()
    }
}

impl<R: Read> SeekCache<R> {
    /// Wraps `source` using the default [`CacheConfig`].
    pub fn new(source: R) -> Self {
        Self::with_config(source, CacheConfig::default())
    }

    /// Wraps `source`, reserving `capacity` bytes for the buffer.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self::with_config(
            source,
            CacheConfig::default().with_initial_capacity(capacity),
        )
    }

    /// Wraps `source` using `config`.
    pub fn with_config(source: R, config: CacheConfig) -> Self {
        SeekCache {
            source: ReadCounter::new(source),
            buffer: Vec::with_capacity(config.initial_capacity),
            position: 0,
            drain_chunk: config.drain_chunk(),
            exhausted: false,
            held_error: None,
        }
    }
}

impl<R> SeekCache<R> {
    /// Current read position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Every byte pulled from the source so far, starting at offset 0.
    #[inline]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of bytes pulled from the source so far.
    #[inline]
    pub fn bytes_consumed(&self) -> u64 {
        self.source.bytes_read()
    }

    /// Whether the source has reported end of data.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns a reference to the source.
    #[inline]
    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }

    /// Returns the source, dropping the buffered bytes.
    ///
    /// The source continues where the cache stopped pulling, which may be
    /// past the current position.
    #[inline]
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

impl<R: Read> SeekCache<R> {
    /// Returns the held error, or whether the source may still produce data.
    fn source_ready(&mut self) -> io::Result<bool> {
        if let Some(err) = self.held_error.take() {
            return Err(err);
        }
        Ok(!self.exhausted)
    }

    fn hold(&mut self, err: io::Error) {
        event!(debug, error = %err, "holding source error until the next pull");
        self.held_error = Some(err);
    }

    fn mark_exhausted(&mut self) {
        event!(
            debug,
            consumed = self.source.bytes_read(),
            "source reached end of data"
        );
        self.exhausted = true;
    }

    /// Pulls from the source straight into `dst` and records what arrived.
    fn pull_into(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if dst.is_empty() || !self.source_ready()? {
            return Ok(0);
        }
        let n = self.source.read(dst)?;
        if n == 0 {
            self.mark_exhausted();
        }
        self.buffer.extend_from_slice(&dst[..n]);
        debug_assert_eq!(self.buffer.len() as u64, self.source.bytes_read());
        Ok(n)
    }

    /// Pulls at most `want` bytes onto the end of the buffer.
    fn pull(&mut self, want: usize) -> io::Result<usize> {
        if want == 0 || !self.source_ready()? {
            return Ok(0);
        }
        let start = self.buffer.len();
        self.buffer.resize(start + want, 0);
        match self.source.read(&mut self.buffer[start..]) {
            Ok(n) => {
                self.buffer.truncate(start + n);
                if n == 0 {
                    self.mark_exhausted();
                }
                debug_assert_eq!(self.buffer.len() as u64, self.source.bytes_read());
                Ok(n)
            }
            Err(err) => {
                self.buffer.truncate(start);
                Err(err)
            }
        }
    }

    /// Drains the source until it has produced `target` bytes or it ends.
    /// Returns how many bytes it has produced afterwards.
    fn fill_to(&mut self, target: u64) -> io::Result<u64> {
        let mut len = self.source.bytes_read();
        if len < target {
            event!(trace, buffered = len, wanted = target, "catching up on source");
        }
        while len < target {
            let want = cmp::min(target - len, self.drain_chunk as u64) as usize;
            if self.pull(want)? == 0 {
                break;
            }
            len = self.source.bytes_read();
        }
        Ok(len)
    }

    /// Drains the source until it reports end of data.
    fn fill_to_end(&mut self) -> io::Result<u64> {
        if !self.exhausted {
            event!(
                debug,
                buffered = self.buffer.len(),
                "draining source to locate its end"
            );
        }
        while self.pull(self.drain_chunk)? > 0 {}
        Ok(self.source.bytes_read())
    }
}

impl<R: Read> Read for SeekCache<R> {
    /// Serves the unread part of the buffer first, then pulls the rest of
    /// `buf` from the source in a single call.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = to_index(self.position)?;
        let unread = &self.buffer[start..];
        let copied = cmp::min(unread.len(), buf.len());
        buf[..copied].copy_from_slice(&unread[..copied]);

        if copied == buf.len() {
            self.position += copied as u64;
            return Ok(copied);
        }

        // The buffer is used up, so the source continues exactly at the
        // position reached.
        match self.pull_into(&mut buf[copied..]) {
            Ok(pulled) => {
                let n = copied + pulled;
                self.position += n as u64;
                Ok(n)
            }
            Err(err) if copied > 0 => {
                self.hold(err);
                self.position += copied as u64;
                Ok(copied)
            }
            Err(err) => Err(err),
        }
    }
}

impl<R: Read> ReadAt for SeekCache<R> {
    /// Fills `buf` from `offset` onward, draining the source as far as
    /// needed. A short count means the source ended.
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let offset = check_offset(offset)?;
        if buf.is_empty() {
            return Ok(0);
        }
        let end = offset.saturating_add(buf.len() as u64);

        let before = self.source.bytes_read();
        let reached = match self.fill_to(end) {
            Ok(reached) => reached,
            Err(err) => {
                // Hand out what this call managed to pull, the error follows
                // on the next pull.
                let reached = self.source.bytes_read();
                if reached == before || reached <= offset {
                    return Err(err);
                }
                self.hold(err);
                reached
            }
        };
        if reached <= offset {
            return Ok(0);
        }

        let start = to_index(offset)?;
        let stop = to_index(cmp::min(end, reached))?;
        let n = stop - start;
        buf[..n].copy_from_slice(&self.buffer[start..stop]);
        Ok(n)
    }
}

impl<R: Read> Seek for SeekCache<R> {
    /// Moves the read position, draining the source up to the target.
    ///
    /// A target past the end of the source fails with
    /// [`CacheError::SourceExhausted`] and leaves the position at the end of
    /// the data.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => check_offset(offset)?,
            SeekFrom::Current(delta) => offset_by(self.position, delta)?,
            SeekFrom::End(delta) => {
                let end = self.fill_to_end()?;
                offset_by(end, delta)?
            }
        };

        let reached = self.fill_to(target)?;
        if reached < target {
            event!(debug, wanted = target, reached, "seek target lies past end of data");
            self.position = reached;
            return Err(CacheError::SourceExhausted { target, reached }.into());
        }

        self.position = target;
        Ok(target)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}

impl<R: Read> ByteSource for SeekCache<R> {
    type Seekable = Self;

    #[inline]
    fn into_seekable(self) -> Result<Self, Self> {
        Ok(self)
    }
}

impl<R: Close> Close for SeekCache<R> {
    /// Closes the source. The buffered bytes stay readable.
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        self.source.close()
    }
}
