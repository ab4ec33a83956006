use crate::header::{HeaderBag, HeaderValues};
use crate::stream::Body;

/// Default protocol version of a new message
const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

/// A HTTP message: protocol version, headers and body.
///
/// `Message` is also the header/body part embedded in [`Request`](super::Request)
/// and [`Response`](super::Response). All accessors and `with_*` mutators are
/// provided by the [`HttpMessage`] trait.
#[derive(Debug, Clone)]
pub struct Message {
    version: String,
    headers: HeaderBag,
    body: Body,
}

impl Message {
    /// A message with version `1.1`, no headers and an empty in-memory body.
    pub fn new() -> Self {
        Self::with_body_source(Body::empty())
    }

    /// A message carrying `body`.
    pub fn with_body_source(body: impl Into<Body>) -> Self {
        Self { version: DEFAULT_PROTOCOL_VERSION.to_owned(), headers: HeaderBag::new(), body: body.into() }
    }

    pub(crate) fn headers_mut(&mut self) -> &mut HeaderBag {
        &mut self.headers
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

/// Accessors and immutable mutators shared by every message type.
///
/// Each `with_*` method returns a new value; the value it is called on is not
/// modified. The body is a shared handle, so a derived message reads the same
/// stream until [`with_body`](HttpMessage::with_body) replaces it.
pub trait HttpMessage: Clone {
    fn message(&self) -> &Message;

    fn message_mut(&mut self) -> &mut Message;

    fn protocol_version(&self) -> &str {
        &self.message().version
    }

    fn with_protocol_version(&self, version: &str) -> Self {
        let mut next = self.clone();
        version.clone_into(&mut next.message_mut().version);
        next
    }

    /// All headers in first-insertion order, with their display names.
    fn headers(&self) -> &HeaderBag {
        &self.message().headers
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().contains(name)
    }

    /// The values of a header, looked up case-insensitively; empty if absent.
    fn header(&self, name: &str) -> &[String] {
        self.headers().get(name)
    }

    /// The values of a header joined with `", "`; empty if absent.
    fn header_line(&self, name: &str) -> String {
        self.headers().get_line(name)
    }

    /// Replaces all values of a header.
    fn with_header(&self, name: &str, value: impl HeaderValues) -> Self {
        let mut next = self.clone();
        next.message_mut().headers_mut().set(name, value);
        next
    }

    /// Appends values to a header, creating it if needed.
    fn with_added_header(&self, name: &str, value: impl HeaderValues) -> Self {
        let mut next = self.clone();
        next.message_mut().headers_mut().add(name, value);
        next
    }

    fn without_header(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.message_mut().headers_mut().remove(name);
        next
    }

    fn body(&self) -> &Body {
        &self.message().body
    }

    fn with_body(&self, body: Body) -> Self {
        let mut next = self.clone();
        next.message_mut().body = body;
        next
    }
}

impl HttpMessage for Message {
    fn message(&self) -> &Message {
        self
    }

    fn message_mut(&mut self) -> &mut Message {
        self
    }
}
