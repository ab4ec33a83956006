use bytes::Bytes;
use micro_message::header::canonical_name;
use micro_message::protocol::{ArgumentError, HttpError, HttpMessage, Message, StreamError};
use micro_message::stream::{Body, MemoryStreamFactory, Stream, StreamFactory, copy_to_stream};
use tracing::{debug, trace};

use crate::boundary::Boundary;
use crate::part::{PartOptions, prepare};

/// Accumulates parts and renders them as a `multipart/form-data` body.
///
/// ```
/// use micro_message::protocol::{HttpMessage, Request};
/// use micro_multipart::{MultipartStreamBuilder, PartOptions};
///
/// let mut builder = MultipartStreamBuilder::new();
/// builder
///     .add_string("hello", PartOptions::new().field_name("greeting"))
///     .unwrap()
///     .add_string("{}", PartOptions::new().field_name("doc").file_name("doc.json"))
///     .unwrap();
///
/// let request = Request::from_uri_str("POST", "http://example.com/upload").unwrap();
/// let request = builder.render_into_message(&request).unwrap();
///
/// assert!(request.header_line("Content-Type").starts_with("multipart/form-data; boundary=\""));
/// ```
#[derive(Debug)]
pub struct MultipartStreamBuilder<F = MemoryStreamFactory> {
    parts: Vec<Message>,
    boundary: Boundary,
    output: Option<Body>,
    factory: F,
}

impl MultipartStreamBuilder {
    /// A builder rendering into in-memory streams, with a random boundary.
    pub fn new() -> Self {
        Self::with_factory(MemoryStreamFactory)
    }
}

impl Default for MultipartStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: StreamFactory> MultipartStreamBuilder<F> {
    /// A builder whose rendered output and string parts come from `factory`.
    pub fn with_factory(factory: F) -> Self {
        Self { parts: Vec::new(), boundary: Boundary::random(), output: None, factory }
    }

    /// Drops all parts and the last rendered output, and picks a new random
    /// boundary.
    pub fn reset(&mut self) -> &mut Self {
        self.parts.clear();
        self.output = None;
        self.boundary = Boundary::random();
        debug!(boundary = %self.boundary, "multipart builder reset");
        self
    }

    pub fn boundary(&self) -> &str {
        self.boundary.as_str()
    }

    /// Replaces the boundary with a caller-chosen one.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidBoundary`] if `boundary` is empty after
    /// trimming or holds characters RFC 2046 does not allow.
    pub fn set_boundary(&mut self, boundary: &str) -> Result<&mut Self, ArgumentError> {
        self.boundary = Boundary::new(boundary)?;
        Ok(self)
    }

    /// The prepared parts, in insertion order.
    pub fn parts(&self) -> &[Message] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The body produced by the last [`render`](Self::render), if any.
    pub fn output(&self) -> Option<&Body> {
        self.output.as_ref()
    }

    /// Appends `message` as a part.
    ///
    /// The part shares the message's body stream; its headers are derived as
    /// described on [`PartOptions`].
    ///
    /// # Errors
    ///
    /// - [`ArgumentError::InvalidFieldName`] for a blank field name
    /// - [`StreamError`] if the body size cannot be queried
    pub fn add_part<M: HttpMessage>(&mut self, message: &M, options: PartOptions) -> Result<&mut Self, HttpError> {
        let part = prepare(message, &options)?;
        trace!(index = self.parts.len(), headers = part.headers().len(), "multipart part added");
        self.parts.push(part);
        Ok(self)
    }

    /// Appends a part whose content is `body`.
    pub fn add_stream(&mut self, body: Body, options: PartOptions) -> Result<&mut Self, HttpError> {
        self.add_part(&Message::with_body_source(body), options)
    }

    /// Appends a part whose content is `content`, held in a stream from the
    /// builder's factory.
    pub fn add_string(&mut self, content: impl Into<Bytes>, options: PartOptions) -> Result<&mut Self, HttpError> {
        let body = self.factory.create_stream_from(content.into());
        self.add_stream(body, options)
    }

    /// Writes every part into a fresh stream and returns it rewound.
    ///
    /// Seekable part bodies are rewound before copying, so rendering twice
    /// yields the same bytes. Non-seekable bodies are copied from their
    /// current position.
    ///
    /// # Errors
    ///
    /// Any [`StreamError`] raised while reading a part or writing the output.
    pub fn render(&mut self) -> Result<Body, StreamError> {
        let output = self.factory.create_stream();
        let boundary = self.boundary.as_str();

        output.with_stream(|out| {
            for part in &self.parts {
                write_part(out, boundary, part)?;
            }
            write_all(out, format!("--{boundary}--\r\n").as_bytes())?;
            out.rewind()
        })?;

        debug!(parts = self.parts.len(), size = ?output.size()?, "multipart body rendered");
        self.output = Some(output.clone());
        Ok(output)
    }

    /// Renders and attaches the result to a copy of `message`, with the
    /// matching `Content-Type: multipart/form-data; boundary="..."` header.
    pub fn render_into_message<M: HttpMessage>(&mut self, message: &M) -> Result<M, StreamError> {
        let body = self.render()?;
        let content_type = format!("{}; boundary=\"{}\"", mime::MULTIPART_FORM_DATA.essence_str(), self.boundary);
        Ok(message.with_header("Content-Type", content_type).with_body(body))
    }

    /// Renders and returns the whole body as bytes.
    pub fn render_bytes(&mut self) -> Result<Bytes, StreamError> {
        self.render()?.to_bytes()
    }
}

fn write_part(out: &mut dyn Stream, boundary: &str, part: &Message) -> Result<(), StreamError> {
    let mut head = format!("--{boundary}\r\n");
    for (name, value) in part_headers(part) {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");
    write_all(out, head.as_bytes())?;

    let copied = part.body().with_stream(|body| {
        if body.is_seekable() {
            body.rewind()?;
        }
        copy_to_stream(body, out)
    })?;
    trace!(bytes = copied, "multipart part body copied");

    write_all(out, b"\r\n")
}

/// The headers emitted for a part: only `Content*` and `X-*` names, in
/// canonical casing, sorted by name.
fn part_headers(part: &Message) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = part
        .headers()
        .iter()
        .map(|entry| (canonical_name(entry.name()), entry.line()))
        .filter(|(name, _)| name.starts_with("Content") || name.starts_with("X-"))
        .filter(|(name, value)| !(name == "Content-Type" && value.is_empty()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));
    headers
}

fn write_all(out: &mut dyn Stream, mut buf: &[u8]) -> Result<(), StreamError> {
    while !buf.is_empty() {
        let written = out.write(buf)?;
        if written == 0 {
            return Err(StreamError::io(std::io::Error::from(std::io::ErrorKind::WriteZero)));
        }
        buf = &buf[written..];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::SeekFrom;

    use indoc::indoc;
    use micro_message::protocol::Request;
    use micro_message::stream::{Metadata, ReaderStream};

    use super::*;

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    fn fixed_builder() -> MultipartStreamBuilder {
        let mut builder = MultipartStreamBuilder::new();
        builder.set_boundary("boundary").unwrap();
        builder
    }

    #[test]
    fn renders_form_data() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let mut builder = fixed_builder();
        builder.add_string("hello", PartOptions::new().field_name("greeting")).unwrap();
        builder.add_string(r#"{"a":1}"#, PartOptions::new().field_name("doc").file_name("data/doc.json")).unwrap();

        let expected = indoc! {r#"
            --boundary
            Content-Disposition: form-data; name="greeting"
            Content-Length: 5

            hello
            --boundary
            Content-Disposition: form-data; name="doc"; filename="doc.json"
            Content-Length: 7
            Content-Type: application/json

            {"a":1}
            --boundary--
            "#};

        assert_eq!(builder.render_bytes().unwrap(), crlf(expected).as_bytes());
    }

    #[test]
    fn empty_builder_renders_only_the_closing_delimiter() {
        let mut builder = fixed_builder();

        assert_eq!(builder.render_bytes().unwrap(), &b"--boundary--\r\n"[..]);
    }

    #[test]
    fn rendering_is_repeatable() {
        let mut builder = fixed_builder();
        builder.add_string("one", PartOptions::new().field_name("a")).unwrap();
        builder.add_string("two", PartOptions::new().field_name("b")).unwrap();

        let first = builder.render().unwrap();
        first.seek(SeekFrom::End(0)).unwrap();
        let second = builder.render().unwrap();

        assert!(!Body::ptr_eq(&first, &second));
        assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
        assert!(Body::ptr_eq(builder.output().unwrap(), &second));
    }

    #[test]
    fn output_is_rewound() {
        let mut builder = fixed_builder();
        builder.add_string("x", PartOptions::new().field_name("a")).unwrap();

        let output = builder.render().unwrap();
        assert_eq!(output.tell().unwrap(), 0);
    }

    #[test]
    fn only_content_and_extension_headers_are_emitted_in_order() {
        let message = Message::with_body_source("body")
            .with_header("x-zeta", "z")
            .with_header("Authorization", "secret")
            .with_header("content-type", "text/plain")
            .with_header("X-alpha", ["a", "b"])
            .with_header("Host", "example.com");

        let mut builder = fixed_builder();
        builder.add_part(&message, PartOptions::new().suppress_content_length()).unwrap();

        let expected = indoc! {"
            --boundary
            Content-Type: text/plain
            X-Alpha: a, b
            X-Zeta: z

            body
            --boundary--
            "};

        assert_eq!(builder.render_bytes().unwrap(), crlf(expected).as_bytes());
    }

    #[test]
    fn empty_content_type_is_skipped() {
        let message = Message::with_body_source("x").with_header("Content-Type", "");

        let mut builder = fixed_builder();
        builder.add_part(&message, PartOptions::new().field_name("f").suppress_content_length()).unwrap();

        let rendered = builder.render_bytes().unwrap();
        assert!(!String::from_utf8_lossy(&rendered).contains("Content-Type"));
    }

    #[test]
    fn parts_split_back_into_headers_and_bodies() {
        let binary: &[u8] = b"\x00\x01\r\n--not-a-boundary\r\n\xff";

        let mut builder = fixed_builder();
        builder.set_boundary("ABC-123").unwrap();
        builder.add_string("plain text", PartOptions::new().field_name("text")).unwrap();
        builder
            .add_string(binary.to_vec(), PartOptions::new().field_name("file").file_name("a.png").header("X-Sum", "42"))
            .unwrap();

        let rendered = builder.render_bytes().unwrap();
        let rendered = rendered.as_ref();
        let delimiter = b"--ABC-123";

        let mut sections = Vec::new();
        let mut rest = rendered;
        while let Some(at) = rest.windows(delimiter.len()).position(|window| window == delimiter) {
            sections.push(&rest[..at]);
            rest = &rest[at + delimiter.len()..];
        }
        assert_eq!(sections[0], b"");
        assert_eq!(rest, b"--\r\n");

        let parts: Vec<(Vec<(String, String)>, &[u8])> = sections[1..]
            .iter()
            .map(|section| {
                let section = section.strip_prefix(b"\r\n").unwrap();
                let split = section.windows(4).position(|window| window == b"\r\n\r\n").unwrap();
                let mut headers = [httparse::EMPTY_HEADER; 8];
                let httparse::Status::Complete((consumed, headers)) =
                    httparse::parse_headers(&section[..split + 4], &mut headers).unwrap()
                else {
                    panic!("incomplete part headers");
                };
                assert_eq!(consumed, split + 4);

                let headers = headers
                    .iter()
                    .map(|header| (header.name.to_owned(), String::from_utf8(header.value.to_vec()).unwrap()))
                    .collect();
                let body = section[split + 4..].strip_suffix(b"\r\n").unwrap();
                (headers, body)
            })
            .collect();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].1, b"plain text");
        assert_eq!(
            parts[1].0,
            [
                ("Content-Disposition".to_owned(), r#"form-data; name="file"; filename="a.png""#.to_owned()),
                ("Content-Length".to_owned(), binary.len().to_string()),
                ("Content-Type".to_owned(), "image/png".to_owned()),
                ("X-Sum".to_owned(), "42".to_owned()),
            ]
        );
        assert_eq!(parts[1].1, binary);
    }

    #[test]
    fn non_seekable_parts_are_copied_without_length() {
        let mut builder = fixed_builder();
        builder
            .add_stream(Body::new(ReaderStream::new(&b"streamed"[..])), PartOptions::new().field_name("s"))
            .unwrap();

        let expected = indoc! {r#"
            --boundary
            Content-Disposition: form-data; name="s"

            streamed
            --boundary--
            "#};

        assert_eq!(builder.render_bytes().unwrap(), crlf(expected).as_bytes());
    }

    #[test]
    fn render_into_message_sets_content_type_and_body() {
        let mut builder = fixed_builder();
        builder.add_string("v", PartOptions::new().field_name("k")).unwrap();

        let request = Request::from_uri_str("POST", "http://example.com/form").unwrap();
        let rendered = builder.render_into_message(&request).unwrap();

        assert_eq!(rendered.header_line("Content-Type"), r#"multipart/form-data; boundary="boundary""#);
        assert_eq!(rendered.header_line("Host"), "example.com");
        assert!(Body::ptr_eq(rendered.body(), builder.output().unwrap()));
        assert!(!request.has_header("Content-Type"));
    }

    #[test]
    fn reset_clears_parts_and_boundary() {
        let mut builder = fixed_builder();
        builder.add_string("v", PartOptions::new().field_name("k")).unwrap();
        builder.render().unwrap();

        builder.reset();

        assert!(builder.is_empty());
        assert!(builder.output().is_none());
        assert_ne!(builder.boundary(), "boundary");
        assert_eq!(builder.boundary().len(), 40);
    }

    #[test]
    fn invalid_boundary_keeps_the_previous_one() {
        let mut builder = fixed_builder();

        assert!(matches!(builder.set_boundary("bad boundary!"), Err(ArgumentError::InvalidBoundary { .. })));
        assert_eq!(builder.boundary(), "boundary");
    }

    #[test]
    fn blank_field_name_adds_nothing() {
        let mut builder = fixed_builder();

        let result = builder.add_string("v", PartOptions::new().field_name(""));
        assert!(matches!(result, Err(HttpError::InvalidArgument { source: ArgumentError::InvalidFieldName })));
        assert_eq!(builder.len(), 0);
    }

    struct FailingStream;

    impl Stream for FailingStream {
        fn size(&self) -> Option<u64> {
            Some(4)
        }

        fn tell(&self) -> Result<u64, StreamError> {
            Ok(0)
        }

        fn eof(&self) -> bool {
            false
        }

        fn is_seekable(&self) -> bool {
            false
        }

        fn seek(&mut self, _pos: SeekFrom) -> Result<u64, StreamError> {
            Err(StreamError::NotSeekable)
        }

        fn is_readable(&self) -> bool {
            true
        }

        fn read(&mut self, _len: usize) -> Result<Bytes, StreamError> {
            Err(StreamError::io(std::io::Error::other("disk gone")))
        }

        fn contents(&mut self) -> Result<Bytes, StreamError> {
            self.read(0)
        }

        fn is_writable(&self) -> bool {
            false
        }

        fn write(&mut self, _buf: &[u8]) -> Result<usize, StreamError> {
            Err(StreamError::NotWritable)
        }

        fn metadata(&self) -> Metadata {
            Metadata::new()
        }

        fn close(&mut self) {}
    }

    #[test]
    fn stream_failures_propagate() {
        let mut builder = fixed_builder();
        builder.add_stream(Body::new(FailingStream), PartOptions::new().field_name("f")).unwrap();

        assert!(matches!(builder.render(), Err(StreamError::Io { .. })));
        assert!(builder.output().is_none());
    }
}
