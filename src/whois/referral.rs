//! Referral marker extraction.
//!
//! Root and registry responses point at a more specific server with a line
//! such as `whois:        whois.verisign-grs.com`.

use std::sync::LazyLock;

use regex::bytes::Regex;

use super::types::Authority;

/// Literal `whois:`, whitespace, then an RFC 1035 style host token.
///
/// The token has to end at whitespace or at the end of the text, so a host
/// written with uppercase letters is rejected outright instead of being cut
/// down to its lowercase prefix.
const REFERRAL_PATTERN: &str = r"whois:\s+([a-z0-9\-\.]+)(?:\s|$)";

fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

static REFERRAL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(REFERRAL_PATTERN, "REFERRAL_RE"));

/// Returns the host named by the first referral marker in `response`.
///
/// Responses are raw bytes; the host token itself is always ASCII.
pub fn extract_referral_host(response: &[u8]) -> Option<&str> {
    REFERRAL_RE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .and_then(|m| std::str::from_utf8(m.as_bytes()).ok())
}

/// Returns the authority named by the first referral marker, on `port`.
pub fn extract_referral(response: &[u8], port: u16) -> Option<Authority> {
    extract_referral_host(response).map(|host| Authority::new(host, port))
}
