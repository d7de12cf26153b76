#![allow(dead_code)]
// lives in its own folder so cargo does not run it as an integration test

use std::io::{self, Read};

use seekio::{ByteSource, Unseekable};

pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// A forward-only source that records every pull made from it.
#[derive(Debug, Clone)]
pub struct TestSource {
    data: Vec<u8>,
    pos: usize,
    max_read: Option<usize>,
    fail_at: Option<usize>,
    /// `(requested, produced)` for every call to `read`.
    pub pulls: Vec<(usize, usize)>,
}

impl TestSource {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            max_read: None,
            fail_at: None,
            pulls: Vec::new(),
        }
    }

    pub fn alphabet() -> Self {
        Self::new(ALPHABET)
    }

    /// Never hand out more than `max_read` bytes per call.
    pub fn with_max_read(mut self, max_read: usize) -> Self {
        self.max_read = Some(max_read);
        self
    }

    /// Fail exactly once, when the read position reaches `at`.
    pub fn failing_at(mut self, at: usize) -> Self {
        self.fail_at = Some(at);
        self
    }

    pub fn produced(&self) -> usize {
        self.pulls.iter().map(|(_, produced)| produced).sum()
    }

    pub fn eof_pulls(&self) -> usize {
        self.pulls
            .iter()
            .filter(|(requested, produced)| *requested > 0 && *produced == 0)
            .count()
    }
}

impl Read for TestSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_at == Some(self.pos) {
            self.fail_at = None;
            self.pulls.push((buf.len(), 0));
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "test source failed"));
        }
        let mut n = buf.len().min(self.data.len() - self.pos);
        if let Some(max_read) = self.max_read {
            n = n.min(max_read);
        }
        if let Some(fail_at) = self.fail_at {
            n = n.min(fail_at - self.pos);
        }
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        self.pulls.push((buf.len(), n));
        Ok(n)
    }
}

impl ByteSource for TestSource {
    type Seekable = Unseekable;

    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

/// Reads into a buffer of `len` bytes and returns what was read as a string.
pub fn read_str<R: Read>(reader: &mut R, len: usize) -> String {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).expect("read should succeed");
    String::from_utf8(buf).expect("test data is ascii")
}
