//! `multipart/form-data` body rendering on top of `micro-message`
//!
//! [`MultipartStreamBuilder`] collects parts (any [`HttpMessage`], raw
//! [`Body`] streams or strings), derives their `Content-Disposition`,
//! `Content-Type` and `Content-Length` headers, and serializes them between
//! boundary delimiters as described by RFC 7578 and RFC 2046.
//!
//! # Example
//!
//! ```
//! use micro_multipart::{MultipartStreamBuilder, PartOptions};
//!
//! let mut builder = MultipartStreamBuilder::new();
//! builder.set_boundary("xyz").unwrap();
//! builder.add_string("42", PartOptions::new().field_name("answer")).unwrap();
//!
//! let body = builder.render_bytes().unwrap();
//! assert_eq!(
//!     body,
//!     "--xyz\r\nContent-Disposition: form-data; name=\"answer\"\r\nContent-Length: 2\r\n\r\n42\r\n--xyz--\r\n"
//! );
//! ```
//!
//! [`HttpMessage`]: micro_message::protocol::HttpMessage
//! [`Body`]: micro_message::stream::Body

mod boundary;
mod builder;
mod part;

pub use boundary::Boundary;
pub use builder::MultipartStreamBuilder;
pub use part::PartOptions;
