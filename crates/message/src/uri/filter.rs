//! Per-component filters applied on every uri write.
//!
//! Percent-encoding is single pass and idempotent: a byte outside the allowed
//! set of a component is escaped as `%XX`, while a `%` that already starts a
//! valid `%XX` triplet is left alone, so filtering an encoded value twice
//! never double-escapes it.

use std::net::Ipv6Addr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::ensure;
use crate::protocol::ArgumentError;

/// Everything but `unreserved` (RFC 3986 §2.3)
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Everything but `unreserved` and `sub-delims` (RFC 3986 §2.2)
const USERINFO: &AsciiSet = &UNRESERVED
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

const PATH: &AsciiSet = &USERINFO.remove(b':').remove(b'@').remove(b'/');

const QUERY_OR_FRAGMENT: &AsciiSet = &PATH.remove(b'?');

/// Characters that would change the structure of the authority if left in a host
const HOST_DELIMITERS: [char; 7] = ['/', '?', '#', '@', '[', ']', ':'];

/// Registered default ports, elided from the serialized form
const DEFAULT_PORTS: [(&str, u16); 13] = [
    ("http", 80),
    ("https", 443),
    ("ws", 80),
    ("wss", 443),
    ("ftp", 21),
    ("gopher", 70),
    ("nntp", 119),
    ("news", 119),
    ("telnet", 23),
    ("tn3270", 23),
    ("imap", 143),
    ("pop", 110),
    ("ldap", 389),
];

/// The registered default port of `scheme`, if any.
pub fn default_port(scheme: &str) -> Option<u16> {
    DEFAULT_PORTS.iter().find(|(name, _)| *name == scheme).map(|(_, port)| *port)
}

/// Lowercases the scheme and checks `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
pub(crate) fn filter_scheme(scheme: &str) -> Result<String, ArgumentError> {
    let scheme = scheme.trim().to_lowercase();

    let mut chars = scheme.chars();
    if let Some(first) = chars.next() {
        ensure!(first.is_ascii_alphabetic(), ArgumentError::invalid_scheme(&scheme));
        ensure!(
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
            ArgumentError::invalid_scheme(&scheme)
        );
    }

    Ok(scheme)
}

/// Brackets and validates IPv6 literals, lowercases everything else.
pub(crate) fn filter_host(host: &str) -> Result<String, ArgumentError> {
    let unbracketed = host.trim_matches(['[', ']']);
    if unbracketed.parse::<Ipv6Addr>().is_ok() {
        return Ok(format!("[{}]", unbracketed.to_ascii_lowercase()));
    }

    ensure!(
        !host.contains(HOST_DELIMITERS) && !host.contains(|c: char| c.is_whitespace() || c.is_control()),
        ArgumentError::invalid_host(host)
    );
    Ok(host.to_lowercase())
}

pub(crate) fn filter_port(port: Option<u32>) -> Result<Option<u16>, ArgumentError> {
    match port {
        None => Ok(None),
        Some(port) => u16::try_from(port).map(Some).map_err(|_overflow| ArgumentError::invalid_port(port)),
    }
}

pub(crate) fn filter_user_info(user_or_pass: &str) -> String {
    encode(user_or_pass, USERINFO)
}

pub(crate) fn filter_path(path: &str) -> String {
    encode(path, PATH)
}

pub(crate) fn filter_query_or_fragment(query_or_fragment: &str) -> String {
    encode(query_or_fragment, QUERY_OR_FRAGMENT)
}

fn encode(input: &str, set: &'static AsciiSet) -> String {
    let bytes = input.as_bytes();
    let mut encoded = String::with_capacity(input.len());

    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if is_percent_triplet(&bytes[i..]) {
            encoded.extend(utf8_percent_encode(&input[start..i], set));
            encoded.push_str(&input[i..i + 3]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }

    encoded.extend(utf8_percent_encode(&input[start..], set));
    encoded
}

fn is_percent_triplet(bytes: &[u8]) -> bool {
    matches!(bytes, [b'%', hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_lowercased_and_checked() {
        assert_eq!(filter_scheme(" HTTPS ").unwrap(), "https");
        assert_eq!(filter_scheme("svn+ssh").unwrap(), "svn+ssh");
        assert_eq!(filter_scheme("").unwrap(), "");

        assert!(matches!(filter_scheme("1http"), Err(ArgumentError::InvalidScheme { .. })));
        assert!(matches!(filter_scheme("ht tp"), Err(ArgumentError::InvalidScheme { .. })));
        assert!(matches!(filter_scheme("htt_p"), Err(ArgumentError::InvalidScheme { .. })));
    }

    #[test]
    fn host_filters() {
        assert_eq!(filter_host("ExAmPlE.CoM").unwrap(), "example.com");
        assert_eq!(filter_host("::1").unwrap(), "[::1]");
        assert_eq!(filter_host("[2001:DB8::1]").unwrap(), "[2001:db8::1]");
        assert_eq!(filter_host("192.168.0.1").unwrap(), "192.168.0.1");
        assert_eq!(filter_host("").unwrap(), "");

        assert!(matches!(filter_host("[not-an-ip]"), Err(ArgumentError::InvalidHost { .. })));
        assert!(matches!(filter_host("exa mple.com"), Err(ArgumentError::InvalidHost { .. })));
        assert!(matches!(filter_host("a/b"), Err(ArgumentError::InvalidHost { .. })));
    }

    #[test]
    fn port_range() {
        assert_eq!(filter_port(None).unwrap(), None);
        assert_eq!(filter_port(Some(0)).unwrap(), Some(0));
        assert_eq!(filter_port(Some(65535)).unwrap(), Some(65535));
        assert!(matches!(filter_port(Some(65536)), Err(ArgumentError::InvalidPort { .. })));
    }

    #[test]
    fn path_encoding() {
        assert_eq!(filter_path("/foo bar/b@z:1"), "/foo%20bar/b@z:1");
        assert_eq!(filter_path("/a?b#c"), "/a%3Fb%23c");
        assert_eq!(filter_path("/€"), "/%E2%82%AC");
        assert_eq!(filter_path("/100%"), "/100%25");
    }

    #[test]
    fn encoding_is_idempotent() {
        for input in ["/foo%20bar", "/%e2%82%ac", "/a%2Fb", "/100%25", "/%zz"] {
            let once = filter_path(input);
            assert_eq!(filter_path(&once), once, "{input}");
        }
        assert_eq!(filter_path("/foo%20bar"), "/foo%20bar");
        assert_eq!(filter_path("/%zz"), "/%25zz");
    }

    #[test]
    fn query_and_user_info_sets() {
        assert_eq!(filter_query_or_fragment("a=1&b=/x?y z"), "a=1&b=/x?y%20z");
        assert_eq!(filter_query_or_fragment("frag#ment"), "frag%23ment");
        assert_eq!(filter_user_info("us:er@host"), "us%3Aer%40host");
        assert_eq!(filter_user_info("p!$&'()*+,;="), "p!$&'()*+,;=");
    }

    #[test]
    fn default_ports() {
        assert_eq!(default_port("http"), Some(80));
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("ftp"), Some(21));
        assert_eq!(default_port("custom"), None);
    }
}
