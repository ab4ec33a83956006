use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid argument: {source}")]
    InvalidArgument {
        #[from]
        source: ArgumentError,
    },

    #[error("stream error: {source}")]
    Stream {
        #[from]
        source: StreamError,
    },
}

/// Raised synchronously by the call that introduces a malformed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("scheme contains illegal characters: {scheme:?}")]
    InvalidScheme { scheme: String },

    #[error("invalid host: {host:?}")]
    InvalidHost { host: String },

    #[error("invalid port: {port}")]
    InvalidPort { port: String },

    #[error("unable to parse uri: {reason}")]
    InvalidUri { reason: String },

    #[error("a relative uri must not have a path beginning with a segment containing a colon: {path:?}")]
    RelativePathWithColon { path: String },

    #[error("http method must not be empty")]
    EmptyMethod,

    #[error("invalid http method: {method:?}")]
    InvalidMethod { method: String },

    #[error("invalid request target, cannot contain whitespace: {target:?}")]
    InvalidRequestTarget { target: String },

    #[error("invalid status code: {code}")]
    InvalidStatus { code: u16 },

    #[error("invalid boundary: {reason}")]
    InvalidBoundary { reason: String },

    #[error("invalid form field name")]
    InvalidFieldName,
}

impl ArgumentError {
    pub fn invalid_scheme<S: ToString>(scheme: S) -> Self {
        Self::InvalidScheme { scheme: scheme.to_string() }
    }

    pub fn invalid_host<S: ToString>(host: S) -> Self {
        Self::InvalidHost { host: host.to_string() }
    }

    pub fn invalid_port<S: ToString>(port: S) -> Self {
        Self::InvalidPort { port: port.to_string() }
    }

    pub fn invalid_uri<S: ToString>(reason: S) -> Self {
        Self::InvalidUri { reason: reason.to_string() }
    }

    pub fn relative_path_with_colon<S: ToString>(path: S) -> Self {
        Self::RelativePathWithColon { path: path.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_request_target<S: ToString>(target: S) -> Self {
        Self::InvalidRequestTarget { target: target.to_string() }
    }

    pub fn invalid_boundary<S: ToString>(reason: S) -> Self {
        Self::InvalidBoundary { reason: reason.to_string() }
    }
}

/// Failures of the underlying stream, propagated unchanged to the caller.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("stream is detached")]
    Detached,

    #[error("stream is not seekable")]
    NotSeekable,

    #[error("cannot read from non-readable stream")]
    NotReadable,

    #[error("cannot write to a non-writable stream")]
    NotWritable,

    #[error("stream is already in use")]
    Busy,

    #[error("unable to seek to stream position {position}")]
    InvalidPosition { position: i64 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StreamError {
    pub fn invalid_position(position: i64) -> Self {
        Self::InvalidPosition { position }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
