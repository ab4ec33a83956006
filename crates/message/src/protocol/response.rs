use http::StatusCode;

use crate::protocol::{ArgumentError, HttpMessage, Message};

/// HTTP response message: a [`Message`] plus status code and reason phrase.
#[derive(Debug, Clone)]
pub struct Response {
    message: Message,
    status: StatusCode,
    reason: String,
}

impl Response {
    /// A `200 OK` response with an empty body.
    pub fn new() -> Self {
        Self { message: Message::new(), status: StatusCode::OK, reason: reason_phrase(StatusCode::OK).to_owned() }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    /// Replaces the status; a blank `reason` falls back to the registered phrase of the code.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidStatus`] for codes outside `100..=999`.
    pub fn with_status(&self, code: u16, reason: &str) -> Result<Self, ArgumentError> {
        let status = StatusCode::from_u16(code).map_err(|_invalid| ArgumentError::InvalidStatus { code })?;

        let reason = match reason.trim() {
            "" => reason_phrase(status).to_owned(),
            reason => reason.to_owned(),
        };

        Ok(Self { status, reason, ..self.clone() })
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMessage for Response {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

/// The registered reason phrase of `status`, or `""` if none is known.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    match status.as_u16() {
        420 => "Enhance Your Calm",
        444 => "Connection Closed Without Response",
        499 => "Client Closed Request",
        599 => "Network Connect Timeout Error",
        _ => status.canonical_reason().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ok() {
        let response = Response::new();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.reason_phrase(), "OK");
        assert_eq!(response.protocol_version(), "1.1");
    }

    #[test]
    fn status_with_fallback_phrase() {
        let response = Response::new();

        let not_found = response.with_status(404, "").unwrap();
        assert_eq!(not_found.reason_phrase(), "Not Found");

        let custom = response.with_status(404, " Gone Fishing ").unwrap();
        assert_eq!(custom.reason_phrase(), "Gone Fishing");

        assert_eq!(response.with_status(420, "").unwrap().reason_phrase(), "Enhance Your Calm");
        assert_eq!(response.with_status(799, "").unwrap().reason_phrase(), "");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn invalid_status() {
        assert!(matches!(Response::new().with_status(42, ""), Err(ArgumentError::InvalidStatus { code: 42 })));
        assert!(matches!(Response::new().with_status(1000, ""), Err(ArgumentError::InvalidStatus { code: 1000 })));
    }

    #[test]
    fn headers_survive_status_changes() {
        let response = Response::new().with_header("X-Trace", "abc").with_status(201, "").unwrap();
        assert_eq!(response.header_line("x-trace"), "abc");
        assert_eq!(response.reason_phrase(), "Created");
    }
}
