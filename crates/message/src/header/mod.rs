//! Case-insensitive, order-preserving header storage.
//!
//! Headers are kept in a [`HeaderBag`]: an insertion-ordered map from the
//! lowercased header name to a [`HeaderEntry`] holding the display name and
//! the list of values. Lookups ignore case; enumeration follows the order in
//! which distinct names were first inserted.
//!
//! Names and values are sanitized when they are written, so carriage returns
//! and line feeds never reach storage and cannot split a header line on the
//! wire.

mod bag;
pub use bag::HeaderBag;
pub use bag::HeaderEntry;

mod values;
pub use values::HeaderValues;

/// Strips CR, LF and spaces from a header name, then trims it.
pub fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, '\r' | '\n' | ' ')).collect::<String>().trim().to_owned()
}

/// Strips CR, LF and NUL from a header value and trims surrounding optional whitespace.
pub fn sanitize_value(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| !matches!(c, '\r' | '\n' | '\0')).collect();
    stripped.trim_matches([' ', '\t']).to_owned()
}

/// Lowercased lookup key for a header name.
pub(crate) fn normalize_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Canonical `Title-Case` form of a header name, e.g. `content-type` to `Content-Type`.
pub fn canonical_name(name: &str) -> String {
    name.trim()
        .split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
