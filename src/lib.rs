//! Decorators that add capabilities to plain byte readers.
//!
//! The centrepiece is [`SeekBuffer`], which turns a forward-only [`Read`]
//! into something that can [`Seek`] and [`ReadAt`] without reading the whole
//! stream up front and without ever pulling a byte from the source twice.
//! Around it sit a few small adaptors:
//!
//! - [`ReadCounter`] and [`WriteCounter`] count bytes passing through.
//! - [`fork`] splits a reader into a head and a tail that can be consumed
//!   independently.
//! - [`tee`] copies everything read into a writer.
//! - [`WithClose`] attaches an explicit close step to any value.
//! - [`noise::NoiseReader`] produces seeded pseudo-random bytes for tests.
//!
//! # Seeking a forward-only stream
//!
//! ```rust
//! use std::io::{Read, Seek, SeekFrom};
//! use seekio::SeekBuffer;
//!
//! let socket_like = &b"0123456789"[..];
//! let mut buffer = SeekBuffer::new(socket_like, 4);
//!
//! let mut head = [0u8; 4];
//! buffer.read_exact(&mut head)?;
//! assert_eq!(&head, b"0123");
//!
//! // Going back is served from memory.
//! buffer.seek(SeekFrom::Start(1))?;
//! buffer.read_exact(&mut head)?;
//! assert_eq!(&head, b"1234");
//!
//! // Going past the end is an error that leaves the position at the end.
//! assert!(buffer.seek(SeekFrom::Start(20)).is_err());
//! assert_eq!(buffer.stream_position()?, 10);
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! # Optional Features
//!
//! - `noise` (default): the seeded [`noise::NoiseReader`].
//! - `tracing`: emits `tracing` events when the cache drains its source.
//!
//! [`Read`]: std::io::Read
//! [`Seek`]: std::io::Seek

#![cfg_attr(docsrs, feature(doc_cfg))]

mod close;
mod common;
mod counter;
mod fork;
mod seek_buffer;
mod source;
mod tee;

pub mod constants;
#[cfg(feature = "noise")]
#[cfg_attr(docsrs, doc(cfg(feature = "noise")))]
pub mod noise;

pub use crate::close::{nop_close, with_close, Close, CloseFn, ReadSeekClose, WithClose};
pub use crate::counter::{ReadCounter, WriteCounter};
pub use crate::fork::{fork, Fork, Side};
pub use crate::seek_buffer::{
    seek_raw, CacheConfig, CacheError, SeekBuffer, SeekCache, Whence,
};
pub use crate::source::{ByteSource, Forward, ReadAt, ReadSeekAt, Unseekable};
pub use crate::tee::{tee, TeeReader};
