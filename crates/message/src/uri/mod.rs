//! Immutable uri value (RFC 3986).
//!
//! A [`Uri`] holds the seven generic-syntax components (scheme, user info,
//! host, port, path, query and fragment). Every component is filtered when it
//! is written:
//!
//! - the scheme is lowercased and must match the scheme token grammar
//! - the host is lowercased, IPv6 literals are validated and bracketed
//! - the port is dropped when it equals the registered default of the scheme
//! - user info, path, query and fragment are percent-encoded idempotently
//!
//! Every `with_*` method returns a new value with a single component changed,
//! the value it was called on is left untouched. Serializing a uri and
//! parsing the result again yields an equal uri.
//!
//! # Example
//!
//! ```
//! use micro_message::uri::Uri;
//!
//! let uri: Uri = "HTTP://Example.com:80/a b?q=1".parse().unwrap();
//! assert_eq!(uri.host(), "example.com");
//! assert_eq!(uri.port(), None);
//! assert_eq!(uri.to_string(), "http://example.com/a%20b?q=1");
//!
//! let secure = uri.with_scheme("https").unwrap().with_port(Some(8443));
//! assert_eq!(secure.to_string(), "https://example.com:8443/a%20b?q=1");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::ensure;
use crate::protocol::ArgumentError;

mod filter;
pub use filter::default_port;

mod parser;

use filter::{filter_host, filter_path, filter_port, filter_query_or_fragment, filter_scheme, filter_user_info};

/// An explicit, unfiltered set of uri components.
///
/// The port is wider than `u16` so out of range values coming from outside
/// can be reported instead of truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriParts {
    pub scheme: String,
    pub user: String,
    pub pass: String,
    pub host: String,
    pub port: Option<u32>,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: String,
    user: String,
    pass: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
}

impl Uri {
    /// The empty uri reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a uri reference.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError`] if the string cannot be split into components or
    /// a component is rejected by its filter.
    pub fn parse(input: &str) -> Result<Self, ArgumentError> {
        Self::from_parts(parser::parse(input)?)
    }

    /// Builds a uri from an explicit component set, filtering every component.
    pub fn from_parts(parts: UriParts) -> Result<Self, ArgumentError> {
        let uri = Self {
            scheme: filter_scheme(&parts.scheme)?,
            user: filter_user_info(&parts.user),
            pass: filter_user_info(&parts.pass),
            host: filter_host(&parts.host)?,
            port: filter_port(parts.port)?,
            path: filter_path(&parts.path),
            query: filter_query_or_fragment(&parts.query),
            fragment: filter_query_or_fragment(&parts.fragment),
        };
        uri.checked()
    }

    /// The filtered components.
    pub fn parts(&self) -> UriParts {
        UriParts {
            scheme: self.scheme.clone(),
            user: self.user.clone(),
            pass: self.pass.clone(),
            host: self.host.clone(),
            port: self.port.map(u32::from),
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.pass
    }

    /// `user[:pass]`, empty when no user info is set.
    pub fn user_info(&self) -> String {
        if self.pass.is_empty() { self.user.clone() } else { format!("{}:{}", self.user, self.pass) }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port, `None` when unset or equal to the scheme's default.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// `[user-info@]host[:port]`.
    ///
    /// An empty host of an `http` or `https` uri is reported as `localhost`.
    pub fn authority(&self) -> String {
        let mut authority = if self.host.is_empty() && matches!(self.scheme.as_str(), "http" | "https") {
            "localhost".to_owned()
        } else {
            self.host.clone()
        };

        let user_info = self.user_info();
        if !user_info.is_empty() {
            authority = format!("{user_info}@{authority}");
        }

        if let Some(port) = self.port {
            authority = format!("{authority}:{port}");
        }

        authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Whether the port is unset or the registered default of the scheme.
    pub fn is_default_port(&self) -> bool {
        match self.port {
            None => true,
            Some(port) => default_port(&self.scheme) == Some(port),
        }
    }

    /// Whether the uri has a scheme.
    pub fn is_absolute(&self) -> bool {
        !self.scheme.is_empty()
    }

    pub fn with_scheme(&self, scheme: &str) -> Result<Self, ArgumentError> {
        Self { scheme: filter_scheme(scheme)?, ..self.clone() }.checked()
    }

    /// Replaces the user info; an absent password clears it.
    pub fn with_user_info(&self, user: &str, password: Option<&str>) -> Self {
        Self { user: filter_user_info(user), pass: filter_user_info(password.unwrap_or_default()), ..self.clone() }
    }

    pub fn with_host(&self, host: &str) -> Result<Self, ArgumentError> {
        Ok(Self { host: filter_host(host)?, ..self.clone() })
    }

    pub fn with_port(&self, port: Option<u16>) -> Self {
        let mut uri = Self { port, ..self.clone() };
        uri.elide_default_port();
        uri
    }

    pub fn with_path(&self, path: &str) -> Result<Self, ArgumentError> {
        Self { path: filter_path(path), ..self.clone() }.checked()
    }

    pub fn with_query(&self, query: &str) -> Self {
        Self { query: filter_query_or_fragment(query), ..self.clone() }
    }

    pub fn with_fragment(&self, fragment: &str) -> Self {
        Self { fragment: filter_query_or_fragment(fragment), ..self.clone() }
    }

    fn elide_default_port(&mut self) {
        if self.port.is_some() && self.is_default_port() {
            self.port = None;
        }
    }

    /// Applies the checks that depend on more than one component.
    fn checked(mut self) -> Result<Self, ArgumentError> {
        self.elide_default_port();

        let first_segment = self.path.split('/').next().unwrap_or_default();
        ensure!(
            !self.scheme.is_empty() || !first_segment.contains(':'),
            ArgumentError::relative_path_with_colon(&self.path)
        );

        Ok(self)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authority = self.authority();

        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }

        if !authority.is_empty() || self.scheme == "file" {
            write!(f, "//{authority}")?;
        }

        if !authority.is_empty() && !self.path.is_empty() && !self.path.starts_with('/') {
            write!(f, "/{}", self.path)?;
        } else if authority.is_empty() && self.path.starts_with("//") {
            write!(f, "/{}", self.path.trim_start_matches('/'))?;
        } else {
            f.write_str(&self.path)?;
        }

        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }

        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }

        Ok(())
    }
}

impl FromStr for Uri {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = ArgumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Uri {
    type Error = ArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<UriParts> for Uri {
    type Error = ArgumentError;

    fn try_from(parts: UriParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts)
    }
}
