use std::io::SeekFrom;

use bytes::{Bytes, BytesMut};

use crate::ensure;
use crate::protocol::StreamError;
use crate::stream::{Metadata, Stream};

/// A seekable in-memory stream.
///
/// Writing in the middle of the buffer overwrites existing bytes, writing past
/// the end grows it (a gap left by seeking beyond the end is zero filled).
#[derive(Debug, Clone)]
pub struct MemoryStream {
    buf: BytesMut,
    pos: usize,
    writable: bool,
    closed: bool,
}

impl MemoryStream {
    /// Creates an empty, writable stream.
    pub fn new() -> Self {
        Self { buf: BytesMut::new(), pos: 0, writable: true, closed: false }
    }

    /// Creates a writable stream holding `content`, positioned at the start.
    pub fn with_content(content: impl AsRef<[u8]>) -> Self {
        Self { buf: BytesMut::from(content.as_ref()), pos: 0, writable: true, closed: false }
    }

    /// Creates a stream that rejects writes.
    pub fn read_only(content: impl AsRef<[u8]>) -> Self {
        Self { writable: false, ..Self::with_content(content) }
    }

    fn remaining(&self) -> &[u8] {
        self.buf.get(self.pos..).unwrap_or_default()
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for MemoryStream {
    fn from(content: &str) -> Self {
        Self::with_content(content)
    }
}

impl From<String> for MemoryStream {
    fn from(content: String) -> Self {
        Self::with_content(content)
    }
}

impl From<Bytes> for MemoryStream {
    fn from(content: Bytes) -> Self {
        Self::with_content(content)
    }
}

impl From<Vec<u8>> for MemoryStream {
    fn from(content: Vec<u8>) -> Self {
        Self::with_content(content)
    }
}

impl Stream for MemoryStream {
    fn size(&self) -> Option<u64> {
        (!self.closed).then_some(self.buf.len() as u64)
    }

    fn tell(&self) -> Result<u64, StreamError> {
        ensure!(!self.closed, StreamError::Detached);
        Ok(self.pos as u64)
    }

    fn eof(&self) -> bool {
        self.closed || self.pos >= self.buf.len()
    }

    fn is_seekable(&self) -> bool {
        !self.closed
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        ensure!(!self.closed, StreamError::Detached);

        let len = self.buf.len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).ok(),
            SeekFrom::Current(delta) => (self.pos as i64).checked_add(delta),
            SeekFrom::End(delta) => len.checked_add(delta),
        };

        let Some(target) = target else {
            return Err(StreamError::invalid_position(i64::MAX));
        };
        ensure!(target >= 0, StreamError::invalid_position(target));

        self.pos = target as usize;
        Ok(self.pos as u64)
    }

    fn is_readable(&self) -> bool {
        !self.closed
    }

    fn read(&mut self, len: usize) -> Result<Bytes, StreamError> {
        ensure!(!self.closed, StreamError::Detached);

        let remaining = self.remaining();
        let n = remaining.len().min(len);
        let chunk = Bytes::copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(chunk)
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        ensure!(!self.closed, StreamError::Detached);

        let chunk = Bytes::copy_from_slice(self.remaining());
        self.pos += chunk.len();
        Ok(chunk)
    }

    fn is_writable(&self) -> bool {
        !self.closed && self.writable
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        ensure!(!self.closed, StreamError::Detached);
        ensure!(self.writable, StreamError::NotWritable);

        let end = self.pos + buf.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn metadata(&self) -> Metadata {
        if self.closed {
            return Metadata::new();
        }

        let mode = if self.writable { "w+b" } else { "rb" };
        Metadata::from([
            ("mode".to_owned(), mode.to_owned()),
            ("seekable".to_owned(), "true".to_owned()),
            ("stream_type".to_owned(), "MEMORY".to_owned()),
        ])
    }

    fn close(&mut self) {
        self.buf = BytesMut::new();
        self.pos = 0;
        self.closed = true;
    }
}
