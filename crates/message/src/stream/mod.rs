//! Byte stream capability consumed by messages and multipart bodies.
//!
//! The model never touches a raw file descriptor: everything it needs from a
//! body is expressed by the [`Stream`] trait (size, position, seek, read,
//! write, metadata). Messages hold their body through a [`Body`] handle that
//! can be shared between several message values.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStream`]: a seekable in-memory buffer, the default body and the
//!   default output of multipart rendering
//! - [`ReaderStream`]: a one-shot, read-only adapter over any [`std::io::Read`]

use std::collections::BTreeMap;
use std::io::SeekFrom;

use bytes::Bytes;

use crate::protocol::StreamError;

mod body;
pub use body::Body;

mod copy;
pub use copy::copy_to_stream;

mod factory;
pub use factory::MemoryStreamFactory;
pub use factory::StreamFactory;

mod memory;
pub use memory::MemoryStream;

mod reader;
pub use reader::ReaderStream;

/// Stream metadata, keyed by name (`mode`, `seekable`, `stream_type`, ...).
pub type Metadata = BTreeMap<String, String>;

/// A seekable, readable and writable byte container.
///
/// Implementations report their capabilities through [`is_seekable`](Stream::is_seekable),
/// [`is_readable`](Stream::is_readable) and [`is_writable`](Stream::is_writable), and fail
/// with the matching [`StreamError`] when an operation is not supported. Once closed, every
/// fallible operation returns [`StreamError::Detached`].
#[cfg_attr(test, mockall::automock)]
pub trait Stream {
    /// Size of the stream in bytes, `None` when unknown.
    fn size(&self) -> Option<u64>;

    /// Current read/write position.
    fn tell(&self) -> Result<u64, StreamError>;

    /// Whether the position is at the end of the stream.
    fn eof(&self) -> bool;

    fn is_seekable(&self) -> bool;

    /// Moves the position, returning the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError>;

    fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    fn is_readable(&self) -> bool;

    /// Reads up to `len` bytes; an empty result means nothing is left.
    fn read(&mut self, len: usize) -> Result<Bytes, StreamError>;

    /// Reads everything from the current position to the end.
    fn contents(&mut self) -> Result<Bytes, StreamError>;

    fn is_writable(&self) -> bool;

    /// Writes `buf` at the current position, returning the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError>;

    fn metadata(&self) -> Metadata;

    /// Releases the underlying resource; the stream is detached afterwards.
    fn close(&mut self);
}
