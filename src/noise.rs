//! Pseudo-random byte streams for exercising other readers.
//!
//! Much cheaper than cryptographic randomness and fully reproducible: the
//! bytes produced depend only on the generator and its seed, never on how
//! the stream is sliced into reads. Not suitable for anything but tests and
//! benchmarks.
//!
//! ```rust
//! use std::io::Read;
//! use seekio::noise::NoiseReader;
//!
//! let mut a = NoiseReader::seeded(7);
//! let mut b = NoiseReader::seeded(7);
//!
//! let mut whole = [0u8; 10];
//! a.read_exact(&mut whole)?;
//!
//! let mut split = [0u8; 10];
//! b.read_exact(&mut split[..3])?;
//! b.read_exact(&mut split[3..])?;
//! assert_eq!(whole, split);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Read};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::source::{ByteSource, Unseekable};

const WORD: usize = 4;

/// An endless reader of pseudo-random bytes, drawn from `R` one
/// little-endian `u32` at a time.
#[derive(Clone, Debug)]
pub struct NoiseReader<R: Rng = SmallRng> {
    rng: R,
    /// Last drawn word, of which `word[spent..]` has not been handed out.
    word: [u8; WORD],
    spent: usize,
}

impl NoiseReader<SmallRng> {
    /// Creates a reader backed by `SmallRng` seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new_with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseReader<R> {
    /// Creates a reader backed by a caller-provided generator.
    pub fn new_with_rng(rng: R) -> Self {
        Self {
            rng,
            word: [0; WORD],
            spent: WORD,
        }
    }

    #[inline]
    fn next_word(&mut self) -> [u8; WORD] {
        self.rng.next_u32().to_le_bytes()
    }
}

impl<R: Rng> Read for NoiseReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let leftover = &self.word[self.spent..];
        let n = leftover.len().min(buf.len());
        buf[..n].copy_from_slice(&leftover[..n]);
        self.spent += n;

        let mut chunks = buf[n..].chunks_exact_mut(WORD);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_word());
        }
        let tail = chunks.into_remainder();
        if !tail.is_empty() {
            self.word = self.next_word();
            self.spent = tail.len();
            tail.copy_from_slice(&self.word[..tail.len()]);
        }
        Ok(buf.len())
    }
}

impl<R: Rng> ByteSource for NoiseReader<R> {
    type Seekable = Unseekable;

    #[inline]
    fn into_seekable(self) -> Result<Unseekable, Self> {
        Err(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn collect(seed: u64, read_size: usize, total: usize) -> Vec<u8> {
        let mut reader = NoiseReader::seeded(seed);
        let mut out = Vec::with_capacity(total);
        let mut buf = vec![0u8; read_size];
        while out.len() < total {
            let n = reader.read(&mut buf).unwrap();
            assert_eq!(n, read_size);
            out.extend_from_slice(&buf);
        }
        out.truncate(total);
        out
    }

    #[rstest]
    fn output_independent_of_read_size(#[values(1, 3, 4, 5, 64, 1000)] read_size: usize) {
        assert_eq!(collect(42, read_size, 4096), collect(42, 4096, 4096));
    }

    #[test]
    fn seeds_differ() {
        assert_ne!(collect(1, 64, 64), collect(2, 64, 64));
    }

    #[test]
    fn empty_read() {
        let mut reader = NoiseReader::seeded(0);
        assert_eq!(reader.read(&mut []).unwrap(), 0);
    }

    #[test]
    fn bytes_are_roughly_uniform() {
        let data = collect(1234, 4096, 1 << 18);
        let mut counts = [0u32; 256];
        for byte in data {
            counts[byte as usize] += 1;
        }
        let expected = (1u32 << 18) / 256;
        for count in counts {
            assert!(count > expected / 2 && count < expected * 2, "{count}");
        }
    }
}
