//! HTTP request message.
//!
//! A [`Request`] is a [`Message`] plus a method, a [`Uri`] and an optional
//! explicit request target. Setting the uri (at construction or through
//! [`Request::with_uri`]) recomputes the `Host` header from the uri's host
//! and port and moves it to the first position, as RFC 9112 §3.2 asks
//! clients to send it first.

use http::Method;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ArgumentError, HttpMessage, Message};
use crate::uri::Uri;

#[derive(Debug, Clone)]
pub struct Request {
    message: Message,
    method: Method,
    uri: Uri,
    request_target: Option<String>,
}

impl Request {
    /// Creates a request with an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::EmptyMethod`] for a blank method and
    /// [`ArgumentError::InvalidMethod`] for a method that is not a token.
    pub fn new(method: &str, uri: Uri) -> Result<Self, ArgumentError> {
        let mut request = Self { message: Message::new(), method: parse_method(method)?, uri, request_target: None };
        request.update_host_from_uri();
        Ok(request)
    }

    /// Creates a request from a uri string.
    pub fn from_uri_str(method: &str, uri: &str) -> Result<Self, ArgumentError> {
        Self::new(method, Uri::parse(uri)?)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Replaces the method; it is trimmed and upper-cased first.
    pub fn with_method(&self, method: &str) -> Result<Self, ArgumentError> {
        Ok(Self { method: parse_method(method)?, ..self.clone() })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Replaces the uri.
    ///
    /// Unless `preserve_host` is set, the `Host` header is recomputed from the new
    /// uri and becomes the first header.
    pub fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        let mut next = Self { uri, ..self.clone() };
        if !preserve_host {
            next.update_host_from_uri();
        }
        next
    }

    /// The request target: the explicit one if set, otherwise the origin form
    /// `path[?query]` of the uri (`/` for an empty path).
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.request_target {
            return target.clone();
        }

        let mut target = if self.uri.path().is_empty() { "/".to_owned() } else { self.uri.path().to_owned() };
        if !self.uri.query().is_empty() {
            target.push('?');
            target.push_str(self.uri.query());
        }
        target
    }

    pub fn with_request_target(&self, target: &str) -> Result<Self, ArgumentError> {
        ensure!(!target.contains(char::is_whitespace), ArgumentError::invalid_request_target(target));
        Ok(Self { request_target: Some(target.to_owned()), ..self.clone() })
    }

    fn update_host_from_uri(&mut self) {
        let host = self.uri.host();
        if host.is_empty() {
            return;
        }

        let value = match self.uri.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };
        trace!(host = %value, "set host header from uri");
        self.message.headers_mut().set_first("Host", value);
    }
}

impl HttpMessage for Request {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

fn parse_method(method: &str) -> Result<Method, ArgumentError> {
    let method = method.trim().to_uppercase();
    ensure!(!method.is_empty(), ArgumentError::EmptyMethod);
    Method::from_bytes(method.as_bytes()).map_err(|_invalid| ArgumentError::invalid_method(&method))
}
