//! An immutable data model for HTTP messages and URIs
//!
//! This crate provides the representation layer beneath a HTTP client or
//! server: uris that follow the RFC 3986 generic syntax, header containers that
//! follow the RFC 9110/9112 field rules, and request/response messages built
//! from them. It does no network I/O.
//!
//! # Features
//!
//! - Uri parsing, validation, canonicalization and serialization
//! - Idempotent percent-encoding of uri components
//! - Default port elision
//! - Case-insensitive, case-preserving, insertion-ordered headers
//! - Header injection protection: CR/LF never reach storage
//! - `Host` header kept first on requests
//! - Immutable `with_*` mutators on every value
//! - Pluggable body streams with an in-memory default
//!
//! # Example
//!
//! ```
//! use micro_message::protocol::{HttpMessage, Request};
//! use micro_message::stream::Body;
//!
//! let request = Request::from_uri_str("post", "http://example.com:8080/upload?id=1")
//!     .unwrap()
//!     .with_header("Content-Type", "text/plain")
//!     .with_added_header("X-Tag", ["a", "b"])
//!     .with_body(Body::from("hello"));
//!
//! assert_eq!(request.method(), http::Method::POST);
//! assert_eq!(request.request_target(), "/upload?id=1");
//! assert_eq!(request.header_line("host"), "example.com:8080");
//! assert_eq!(request.header_line("x-tag"), "a, b");
//!
//! let names: Vec<&str> = request.headers().iter().map(|entry| entry.name()).collect();
//! assert_eq!(names, ["Host", "Content-Type", "X-Tag"]);
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`uri`]: the immutable [`uri::Uri`] value and its component filters
//! - [`header`]: the [`header::HeaderBag`] container and header sanitizing
//! - [`protocol`]: [`protocol::Message`], [`protocol::Request`], [`protocol::Response`]
//!   and the error types
//! - [`stream`]: the [`stream::Stream`] capability, [`stream::Body`] handles and
//!   the in-memory stream
//!
//! # Error Handling
//!
//! - [`protocol::ArgumentError`]: malformed input, raised synchronously by the
//!   call that introduces it
//! - [`protocol::StreamError`]: failures of the underlying streams, propagated
//!   unchanged
//! - [`protocol::HttpError`]: wraps both
//!
//! # Limitations
//!
//! - No reference resolution against a base uri
//! - No query-string, cookie or header value semantic parsing
//! - Bodies are single-threaded handles

pub mod header;
pub mod protocol;
pub mod stream;
pub mod uri;

mod utils;
pub(crate) use utils::ensure;
