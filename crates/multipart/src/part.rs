//! Per-part header preparation.

use std::path::Path;

use micro_message::header::HeaderValues;
use micro_message::protocol::{ArgumentError, HttpError, HttpMessage, Message};
use tracing::debug;

/// How a part is described inside the `multipart/form-data` body.
///
/// ```
/// use micro_multipart::PartOptions;
///
/// let options = PartOptions::new()
///     .field_name("avatar")
///     .file_name("uploads/me.png")
///     .header("X-Checksum", "abc123");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartOptions {
    field_name: Option<String>,
    file_name: Option<String>,
    suppress_content_length: bool,
    headers: Vec<(String, Vec<String>)>,
}

impl PartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The form field the part belongs to, emitted as `name="..."`.
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    /// The original file name; only its final path component is emitted, and
    /// its extension drives the guessed `Content-Type`.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Skips computing `Content-Length` for this part.
    pub fn suppress_content_length(mut self) -> Self {
        self.suppress_content_length = true;
        self
    }

    /// Adds an extra header to the part; repeated names accumulate values.
    pub fn header(mut self, name: &str, value: impl HeaderValues) -> Self {
        self.headers.push((name.to_owned(), value.into_header_values()));
        self
    }
}

/// Copies `message` into a standalone part carrying the derived headers.
///
/// Headers the caller already set (`Content-Type`, `Content-Disposition`)
/// are kept as they are; `Content-Length` always reflects the body size
/// unless suppressed or unknown.
pub(crate) fn prepare<M: HttpMessage>(message: &M, options: &PartOptions) -> Result<Message, HttpError> {
    let mut part = Message::with_body_source(message.body().clone())
        .with_protocol_version(message.protocol_version());
    for entry in message.headers() {
        part = part.with_header(entry.name(), entry.values());
    }
    for (name, values) in &options.headers {
        part = part.with_added_header(name, values.as_slice());
    }

    let field_name = match options.field_name.as_deref().map(str::trim) {
        Some("") => return Err(ArgumentError::InvalidFieldName.into()),
        field_name => field_name,
    };
    let file_name = options.file_name.as_deref().map(str::trim).filter(|name| !name.is_empty());

    if !part.has_header("Content-Type") {
        match file_name.and_then(|name| mime_guess::from_path(name).first_raw()) {
            Some(mime) => part = part.with_header("Content-Type", mime),
            None => debug!(file_name = ?file_name, "no content type derived for part"),
        }
    }

    if !part.has_header("Content-Disposition") && (field_name.is_some() || file_name.is_some()) {
        let mut disposition = String::from("form-data");
        if let Some(name) = field_name {
            disposition.push_str(&format!("; name=\"{}\"", quote(name)));
        }
        if let Some(name) = file_name {
            disposition.push_str(&format!("; filename=\"{}\"", quote(basename(name))));
        }
        part = part.with_header("Content-Disposition", disposition);
    }

    if !options.suppress_content_length {
        match part.body().size()? {
            Some(size) => part = part.with_header("Content-Length", size),
            None => debug!("part body size is unknown, Content-Length omitted"),
        }
    }

    Ok(part)
}

fn basename(path: &str) -> &str {
    Path::new(path).file_name().and_then(|name| name.to_str()).unwrap_or(path)
}

fn quote(value: &str) -> String {
    value.replace('"', "%22")
}
