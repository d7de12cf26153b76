use std::io::{self, Seek, SeekFrom};

use super::CacheError;

/// Reference point of a seek, for callers that carry it as a raw code.
///
/// Rust code should prefer [`SeekFrom`] directly. This exists for offsets and
/// origins that arrive as plain integers, for example over an FFI boundary or
/// from a command stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Whence {
    /// Code `0`, relative to the start of the stream.
    Start,
    /// Code `1`, relative to the current position.
    Current,
    /// Code `2`, relative to the end of the stream.
    End,
}

impl Whence {
    /// Combines the origin with `offset`.
    ///
    /// A negative offset from the start can never be valid and fails with
    /// [`CacheError::InvalidOffset`].
    pub fn seek_from(self, offset: i64) -> Result<SeekFrom, CacheError> {
        match self {
            Whence::Start => u64::try_from(offset)
                .map(SeekFrom::Start)
                .map_err(|_| CacheError::InvalidOffset {
                    offset: offset as i128,
                }),
            Whence::Current => Ok(SeekFrom::Current(offset)),
            Whence::End => Ok(SeekFrom::End(offset)),
        }
    }
}

impl TryFrom<i32> for Whence {
    type Error = CacheError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            other => Err(CacheError::InvalidWhence(other)),
        }
    }
}

impl From<Whence> for i32 {
    fn from(whence: Whence) -> Self {
        match whence {
            Whence::Start => 0,
            Whence::Current => 1,
            Whence::End => 2,
        }
    }
}

/// Seeks `seeker` using a raw origin code.
///
/// An unknown code or a negative offset from the start is rejected before
/// `seeker` is touched.
pub fn seek_raw<S: Seek + ?Sized>(seeker: &mut S, offset: i64, whence: i32) -> io::Result<u64> {
    let pos = Whence::try_from(whence)?.seek_from(offset)?;
    seeker.seek(pos)
}
