//! HTTP message types and error handling.
//!
//! # Architecture
//!
//! - **Message** ([`message`]): the protocol version, [`HeaderBag`](crate::header::HeaderBag)
//!   and [`Body`](crate::stream::Body) shared by every message type
//!   - [`Message`]: a bare message, e.g. one part of a multipart body
//!   - [`HttpMessage`]: accessors and `with_*` mutators common to all messages
//!
//! - **Request** ([`request`]): method, [`Uri`](crate::uri::Uri) and request target,
//!   keeping the `Host` header first
//!
//! - **Response** ([`response`]): status code and reason phrase
//!
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ArgumentError`]: malformed values, raised by the call that introduces them
//!   - [`StreamError`]: failures of the underlying body streams
//!
//! All message values are immutable: mutators return a new value and leave the
//! value they were called on as it was.

mod message;
pub use message::HttpMessage;
pub use message::Message;

mod request;
pub use request::Request;

mod response;
pub use response::Response;
pub use response::reason_phrase;

mod error;
pub use error::ArgumentError;
pub use error::HttpError;
pub use error::StreamError;
