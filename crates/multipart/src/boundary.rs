use std::fmt;

use micro_message::protocol::ArgumentError;
use rand::RngCore;
use sha1::{Digest, Sha1};

/// Number of random bytes hashed into a generated boundary
const SEED_SIZE: usize = 8192;

/// A multipart boundary token (RFC 2046 §5.1.1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// A fresh random boundary: the hex SHA-1 digest of 8 KiB of random bytes.
    pub fn random() -> Self {
        let mut seed = vec![0u8; SEED_SIZE];
        rand::thread_rng().fill_bytes(&mut seed);
        Self(hex::encode(Sha1::digest(&seed)))
    }

    /// Validates a caller-provided boundary.
    ///
    /// The value is trimmed and may only contain letters, digits, spaces and
    /// `'()+_,-./:=?`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidBoundary`] for an empty value or one with
    /// characters outside that set.
    pub fn new(boundary: &str) -> Result<Self, ArgumentError> {
        let boundary = boundary.trim();

        if boundary.is_empty() {
            return Err(ArgumentError::invalid_boundary("the given boundary is empty"));
        }

        if let Some(illegal) = boundary.chars().find(|c| !is_boundary_char(*c)) {
            return Err(ArgumentError::invalid_boundary(format!("illegal character {illegal:?} in {boundary:?}")));
        }

        Ok(Self(boundary.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_boundary_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '\'' | '(' | ')' | '+' | '_' | ',' | '-' | '.' | '/' | ':' | '=' | '?' | ' ')
}
