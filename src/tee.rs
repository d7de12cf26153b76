use std::io::{self, Read, Write};

use crate::close::Close;
use crate::source::{ByteSource, Unseekable};

/// Copies everything read from `reader` into `writer`.
///
/// Each read returns only after its bytes were fully written, and a write
/// failure is returned from that read. Closing the tee closes the reader.
pub fn tee<R, W>(reader: R, writer: W) -> TeeReader<R, W>
where
    R: Read,
    W: Write,
{
    TeeReader { reader, writer }
}

/// A reader that duplicates its output into a writer. See [`tee`].
#[derive(Debug)]
pub struct TeeReader<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> TeeReader<R, W> {
    /// Returns a reference to the writer receiving the copies.
    #[inline]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Returns the reader and the writer.
    #[inline]
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> Read for TeeReader<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.writer.write_all(&buf[..n])?;
        }
        Ok(n)
    }
}

impl<R: Read, W: Write> ByteSource for TeeReader<R, W> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

impl<R: Close, W> Close for TeeReader<R, W> {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        self.reader.close()
    }
}
