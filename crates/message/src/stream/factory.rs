use bytes::Bytes;

use crate::stream::{Body, MemoryStream};

/// Creates the streams a component writes into.
///
/// Multipart rendering asks its factory for a fresh stream per render, so
/// plugging a different factory changes where the output lives.
pub trait StreamFactory {
    /// Creates an empty, writable stream.
    fn create_stream(&self) -> Body;

    /// Creates a stream holding `content`, positioned at the start.
    fn create_stream_from(&self, content: Bytes) -> Body;
}

/// Factory for [`MemoryStream`] bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryStreamFactory;

impl StreamFactory for MemoryStreamFactory {
    fn create_stream(&self) -> Body {
        Body::new(MemoryStream::new())
    }

    fn create_stream_from(&self, content: Bytes) -> Body {
        Body::new(MemoryStream::from(content))
    }
}
