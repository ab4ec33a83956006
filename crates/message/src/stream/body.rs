//! Shared handle to a message body stream.

use std::cell::RefCell;
use std::fmt;
use std::io::SeekFrom;
use std::rc::Rc;

use bytes::Bytes;

use crate::protocol::StreamError;
use crate::stream::{MemoryStream, Metadata, Stream, copy_to_stream};

/// The body of a message.
///
/// Cloning a `Body` clones the handle, not the bytes: every message derived
/// from another one through a `with_*` call shares the same underlying stream
/// until its body is replaced. The handle is single-threaded; each call borrows
/// the stream for its own duration and fails with [`StreamError::Busy`] rather
/// than panicking if the stream is already borrowed.
#[derive(Clone)]
pub struct Body {
    inner: Rc<RefCell<Box<dyn Stream>>>,
}

impl Body {
    pub fn new<S: Stream + 'static>(stream: S) -> Self {
        Self { inner: Rc::new(RefCell::new(Box::new(stream))) }
    }

    /// An empty, writable in-memory body.
    pub fn empty() -> Self {
        Self::new(MemoryStream::new())
    }

    /// Returns true if both handles point at the same stream.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.inner, &other.inner)
    }

    /// Runs `f` with shared access to the stream.
    pub fn inspect<R>(&self, f: impl FnOnce(&dyn Stream) -> R) -> Result<R, StreamError> {
        let Ok(guard) = self.inner.try_borrow() else {
            return Err(StreamError::Busy);
        };
        Ok(f(guard.as_ref()))
    }

    /// Runs `f` with exclusive access to the stream.
    pub fn with_stream<R>(&self, f: impl FnOnce(&mut dyn Stream) -> Result<R, StreamError>) -> Result<R, StreamError> {
        let Ok(mut guard) = self.inner.try_borrow_mut() else {
            return Err(StreamError::Busy);
        };
        f(guard.as_mut())
    }

    pub fn size(&self) -> Result<Option<u64>, StreamError> {
        self.inspect(|stream| stream.size())
    }

    pub fn tell(&self) -> Result<u64, StreamError> {
        self.inspect(|stream| stream.tell())?
    }

    pub fn eof(&self) -> Result<bool, StreamError> {
        self.inspect(|stream| stream.eof())
    }

    pub fn is_seekable(&self) -> Result<bool, StreamError> {
        self.inspect(|stream| stream.is_seekable())
    }

    pub fn is_readable(&self) -> Result<bool, StreamError> {
        self.inspect(|stream| stream.is_readable())
    }

    pub fn is_writable(&self) -> Result<bool, StreamError> {
        self.inspect(|stream| stream.is_writable())
    }

    pub fn seek(&self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.with_stream(|stream| stream.seek(pos))
    }

    pub fn rewind(&self) -> Result<(), StreamError> {
        self.with_stream(|stream| stream.rewind())
    }

    pub fn read(&self, len: usize) -> Result<Bytes, StreamError> {
        self.with_stream(|stream| stream.read(len))
    }

    /// Reads the remainder of the stream from the current position.
    pub fn contents(&self) -> Result<Bytes, StreamError> {
        self.with_stream(|stream| stream.contents())
    }

    pub fn write(&self, buf: &[u8]) -> Result<usize, StreamError> {
        self.with_stream(|stream| stream.write(buf))
    }

    pub fn metadata(&self) -> Result<Metadata, StreamError> {
        self.inspect(|stream| stream.metadata())
    }

    pub fn metadata_value(&self, key: &str) -> Result<Option<String>, StreamError> {
        self.inspect(|stream| stream.metadata().remove(key))
    }

    pub fn close(&self) -> Result<(), StreamError> {
        self.with_stream(|stream| {
            stream.close();
            Ok(())
        })
    }

    /// Reads the whole body, rewinding first when the stream is seekable.
    pub fn to_bytes(&self) -> Result<Bytes, StreamError> {
        self.with_stream(|stream| {
            if stream.is_seekable() {
                stream.rewind()?;
            }
            stream.contents()
        })
    }

    /// Copies this body from its current position into `dst`.
    ///
    /// Fails with [`StreamError::Busy`] when both handles share one stream.
    pub fn copy_to(&self, dst: &Body) -> Result<u64, StreamError> {
        self.with_stream(|src| dst.with_stream(|dst| copy_to_stream(src, dst)))
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Body");
        match self.inner.try_borrow() {
            Ok(stream) => debug.field("size", &stream.size()),
            Err(_) => debug.field("size", &"<busy>"),
        };
        debug.finish_non_exhaustive()
    }
}

impl From<MemoryStream> for Body {
    fn from(stream: MemoryStream) -> Self {
        Self::new(stream)
    }
}

impl From<&str> for Body {
    fn from(content: &str) -> Self {
        Self::new(MemoryStream::from(content))
    }
}

impl From<String> for Body {
    fn from(content: String) -> Self {
        Self::new(MemoryStream::from(content))
    }
}

impl From<Bytes> for Body {
    fn from(content: Bytes) -> Self {
        Self::new(MemoryStream::from(content))
    }
}

impl From<Vec<u8>> for Body {
    fn from(content: Vec<u8>) -> Self {
        Self::new(MemoryStream::from(content))
    }
}
