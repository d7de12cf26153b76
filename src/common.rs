use std::io;

use crate::seek_buffer::CacheError;

/// Compile time check that an error type can cross threads and be cloned
/// into several callers.
macro_rules! assert_error_traits {
    ($to_test:path) => {
        const _: () = {
            $crate::common::check_error_traits::<$to_test>();
        };
    };
}
pub(crate) use assert_error_traits;

pub(crate) const fn check_error_traits<T>()
where
    T: std::error::Error + Clone + Send + Sync + 'static,
{
}

/// Emits a `tracing` event when the `tracing` feature is enabled, otherwise
/// expands to nothing.
macro_rules! event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}
pub(crate) use event;

/// Rejects offsets that do not fit a signed 64 bit stream position.
///
/// A negative `i64` cast to `u64` lands above `i64::MAX`, so this is also the
/// negative offset check.
#[inline]
pub(crate) fn check_offset(offset: u64) -> Result<u64, CacheError> {
    if offset > i64::MAX as u64 {
        Err(CacheError::InvalidOffset {
            offset: offset as i64 as i128,
        })
    } else {
        Ok(offset)
    }
}

/// Applies a signed delta to a position, rejecting anything below zero or
/// above `i64::MAX`.
#[inline]
pub(crate) fn offset_by(base: u64, delta: i64) -> Result<u64, CacheError> {
    base.checked_add_signed(delta)
        .and_then(|target| check_offset(target).ok())
        .ok_or(CacheError::InvalidOffset {
            offset: base as i128 + delta as i128,
        })
}

/// Converts a stream position into an index into memory.
#[inline]
pub(crate) fn to_index(offset: u64) -> io::Result<usize> {
    usize::try_from(offset).map_err(|_| {
        io::Error::from(CacheError::InvalidOffset {
            offset: offset as i128,
        })
    })
}
