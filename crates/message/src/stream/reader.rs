use std::io::{Read, SeekFrom};

use bytes::Bytes;

use crate::protocol::StreamError;
use crate::stream::{Metadata, Stream};

/// A read-only, non-seekable stream over any [`Read`] source.
///
/// The size is unknown, so messages carrying this body get no computed
/// Content-Length. The stream reaches EOF the first time the reader returns
/// fewer bytes than requested.
#[derive(Debug)]
pub struct ReaderStream<R> {
    reader: Option<R>,
    pos: u64,
    eof: bool,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader: Some(reader), pos: 0, eof: false }
    }

    /// Detaches the stream and hands back the reader.
    pub fn into_inner(self) -> Option<R> {
        self.reader
    }

    fn reader_mut(&mut self) -> Result<&mut R, StreamError> {
        self.reader.as_mut().ok_or(StreamError::Detached)
    }
}

impl<R: Read> Stream for ReaderStream<R> {
    fn size(&self) -> Option<u64> {
        None
    }

    fn tell(&self) -> Result<u64, StreamError> {
        match self.reader {
            Some(_) => Ok(self.pos),
            None => Err(StreamError::Detached),
        }
    }

    fn eof(&self) -> bool {
        self.reader.is_none() || self.eof
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<u64, StreamError> {
        self.reader_mut()?;
        Err(StreamError::NotSeekable)
    }

    fn is_readable(&self) -> bool {
        self.reader.is_some()
    }

    fn read(&mut self, len: usize) -> Result<Bytes, StreamError> {
        let reader = self.reader_mut()?;

        let mut buf = Vec::with_capacity(len.min(64 * 1024));
        let n = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;

        self.pos += n as u64;
        if n < len {
            self.eof = true;
        }
        Ok(Bytes::from(buf))
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        let reader = self.reader_mut()?;

        let mut buf = Vec::new();
        let n = reader.read_to_end(&mut buf)?;

        self.pos += n as u64;
        self.eof = true;
        Ok(Bytes::from(buf))
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize, StreamError> {
        self.reader_mut()?;
        Err(StreamError::NotWritable)
    }

    fn metadata(&self) -> Metadata {
        if self.reader.is_none() {
            return Metadata::new();
        }

        Metadata::from([
            ("mode".to_owned(), "rb".to_owned()),
            ("seekable".to_owned(), "false".to_owned()),
            ("stream_type".to_owned(), "READER".to_owned()),
        ])
    }

    fn close(&mut self) {
        self.reader = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_until_short_chunk() {
        let mut stream = ReaderStream::new(&b"0123456789"[..]);

        assert_eq!(stream.size(), None);
        assert_eq!(&stream.read(4).unwrap()[..], b"0123");
        assert!(!stream.eof());
        assert_eq!(&stream.read(8).unwrap()[..], b"456789");
        assert!(stream.eof());
        assert_eq!(stream.tell().unwrap(), 10);
    }

    #[test]
    fn cannot_seek_or_write() {
        let mut stream = ReaderStream::new(&b"abc"[..]);

        assert!(matches!(stream.rewind(), Err(StreamError::NotSeekable)));
        assert!(matches!(stream.write(b"x"), Err(StreamError::NotWritable)));

        stream.close();
        assert!(matches!(stream.read(1), Err(StreamError::Detached)));
        assert!(matches!(stream.seek(SeekFrom::Start(0)), Err(StreamError::Detached)));
    }
}
