//! Splitting one reader into two consecutive views.

use std::cmp;
use std::fmt;
use std::io::{self, Read};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::common::event;
use crate::source::{ByteSource, Unseekable};

/// Which part of the forked stream a [`Fork`] yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first `at` bytes.
    Head,
    /// Everything after the first `at` bytes.
    Tail,
}

/// Splits `reader` at byte `at` into a head view and a tail view.
///
/// The head can be read first without any copying. A reader is a FIFO
/// though, so the tail cannot jump ahead: its first read pulls whatever is
/// left of the head into memory, once, and the head is served from there
/// afterwards. Both views may live on different threads.
///
/// ```rust
/// use std::io::Read;
/// use seekio::fork;
///
/// let [mut head, mut tail] = fork(&b"abcdefgh"[..], 3);
/// let mut rest = String::new();
/// tail.read_to_string(&mut rest)?;
/// assert_eq!(rest, "defgh");
///
/// let mut start = String::new();
/// head.read_to_string(&mut start)?;
/// assert_eq!(start, "abc");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn fork<R: Read>(reader: R, at: u64) -> [Fork<R>; 2] {
    let shared = Arc::new(Mutex::new(Shared {
        reader,
        head_remaining: at,
        head_cache: Vec::new(),
        head_read: 0,
        materialized: false,
    }));
    [
        Fork {
            shared: shared.clone(),
            side: Side::Head,
        },
        Fork {
            shared,
            side: Side::Tail,
        },
    ]
}

struct Shared<R> {
    reader: R,
    /// Head bytes still sitting in `reader`.
    head_remaining: u64,
    /// Head bytes pulled out of `reader` on behalf of the tail.
    head_cache: Vec<u8>,
    head_read: usize,
    materialized: bool,
}

impl<R: Read> Shared<R> {
    /// Moves the rest of the head out of the reader. Runs to completion once,
    /// a failed attempt keeps what it got and is retried by the next tail
    /// read.
    fn materialize_head(&mut self) -> io::Result<()> {
        if self.materialized {
            return Ok(());
        }
        event!(
            debug,
            remaining = self.head_remaining,
            "caching head of forked reader"
        );
        let before = self.head_cache.len();
        let result = (&mut self.reader)
            .take(self.head_remaining)
            .read_to_end(&mut self.head_cache);
        self.head_remaining -= (self.head_cache.len() - before) as u64;
        result?;
        self.materialized = true;
        Ok(())
    }

    fn read_head(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let cached = &self.head_cache[self.head_read..];
        if !cached.is_empty() {
            let n = cmp::min(cached.len(), buf.len());
            buf[..n].copy_from_slice(&cached[..n]);
            self.head_read += n;
            return Ok(n);
        }
        if self.materialized || self.head_remaining == 0 {
            return Ok(0);
        }
        let limit = cmp::min(buf.len() as u64, self.head_remaining) as usize;
        let n = self.reader.read(&mut buf[..limit])?;
        self.head_remaining -= n as u64;
        Ok(n)
    }

    fn read_tail(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.materialize_head()?;
        self.reader.read(buf)
    }
}

/// One of the two views returned by [`fork`].
pub struct Fork<R> {
    shared: Arc<Mutex<Shared<R>>>,
    side: Side,
}

impl<R> Fork<R> {
    /// Which part of the stream this view yields.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Shared<R>>> {
        self.shared
            .lock()
            .map_err(|_| io::Error::other("the other side of the fork panicked mid-read"))
    }
}

impl<R> fmt::Debug for Fork<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fork").field("side", &self.side).finish()
    }
}

impl<R: Read> Read for Fork<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut shared = self.lock()?;
        match self.side {
            Side::Head => shared.read_head(buf),
            Side::Tail => shared.read_tail(buf),
        }
    }
}

impl<R: Read> ByteSource for Fork<R> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_are_labelled() {
        let [head, tail] = fork(&b"ab"[..], 1);
        assert_eq!(head.side(), Side::Head);
        assert_eq!(tail.side(), Side::Tail);
    }

    #[test]
    fn head_streams_until_tail_is_touched() {
        let [mut head, mut tail] = fork(&b"abcdefgh"[..], 4);
        let mut one = [0u8; 1];

        head.read_exact(&mut one).unwrap();
        assert_eq!(&one, b"a");
        {
            let shared = head.lock().unwrap();
            assert!(shared.head_cache.is_empty());
            assert_eq!(shared.head_remaining, 3);
        }

        tail.read_exact(&mut one).unwrap();
        assert_eq!(&one, b"e");
        {
            let shared = head.lock().unwrap();
            assert_eq!(shared.head_cache, b"bcd");
            assert!(shared.materialized);
        }

        let mut rest = Vec::new();
        head.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"bcd");
    }

    #[test]
    fn fork_past_the_end() {
        let [mut head, mut tail] = fork(&b"abc"[..], 10);
        let mut out = Vec::new();
        tail.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
        head.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }
}
