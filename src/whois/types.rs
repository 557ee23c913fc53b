//! WHOIS data structures.

use std::borrow::Cow;
use std::fmt;

use crate::config::{HOP_SEPARATOR, ROOT_AUTHORITY_HOST, WHOIS_PORT};
use crate::error_handling::UpstreamError;

/// A WHOIS server, identified by host and port.
///
/// Hosts are stored lowercase so that two spellings of the same server
/// compare equal when detecting referral cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority {
    host: String,
    port: u16,
}

impl Authority {
    /// Creates an authority for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into().to_ascii_lowercase(),
            port,
        }
    }

    /// The IANA root authority every resolution starts from.
    pub fn root() -> Self {
        Self::new(ROOT_AUTHORITY_HOST, WHOIS_PORT)
    }

    /// Host name (lowercase).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Raw bytes returned by one authority for one query.
///
/// WHOIS declares no charset, so the bytes are kept exactly as received and
/// relayed unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HopResponse(Vec<u8>);

impl HopResponse {
    /// Copies response bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Response bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Response decoded for display, invalid UTF-8 replaced.
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// True if the authority sent nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of bytes received.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Consumes the response, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for HopResponse {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for HopResponse {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for HopResponse {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

/// Result of querying one authority.
#[derive(Debug)]
pub enum HopOutcome {
    /// The authority answered and closed the connection.
    Complete(HopResponse),
    /// The exchange failed; `partial` holds whatever arrived first.
    Failed {
        /// Bytes received before the failure (often empty)
        partial: HopResponse,
        /// What went wrong
        error: UpstreamError,
    },
}

impl HopOutcome {
    /// Builds a failed outcome with no data.
    pub fn failed(error: UpstreamError) -> Self {
        HopOutcome::Failed {
            partial: HopResponse::default(),
            error,
        }
    }

    /// Response bytes, complete or partial.
    pub fn response(&self) -> &HopResponse {
        match self {
            HopOutcome::Complete(response) => response,
            HopOutcome::Failed { partial, .. } => partial,
        }
    }
}

/// Why a resolution stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailEnd {
    /// The last response held no referral marker.
    NoReferral,
    /// The last authority could not be queried to completion.
    UpstreamFailure,
    /// The last response referred to an authority already visited.
    ReferralCycle(Authority),
    /// The hop limit was reached while a referral was still pending.
    HopLimit(Authority),
}

/// One visited authority and its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// Authority that was queried
    pub authority: Authority,
    /// What it returned
    pub response: HopResponse,
}

/// Ordered record of every hop of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTrail {
    hops: Vec<Hop>,
    end: TrailEnd,
}

impl ResolutionTrail {
    pub(crate) fn new(hops: Vec<Hop>, end: TrailEnd) -> Self {
        Self { hops, end }
    }

    /// Hops in visitation order.
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Number of hop responses recorded.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// True if no hop was recorded.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Why the walk stopped.
    pub fn end(&self) -> &TrailEnd {
        &self.end
    }

    /// Joins all responses with a blank line, without a trailing separator.
    pub fn into_bytes(self) -> Vec<u8> {
        let responses: Vec<Vec<u8>> = self
            .hops
            .into_iter()
            .map(|hop| hop.response.into_bytes())
            .collect();
        responses.join(HOP_SEPARATOR.as_bytes())
    }
}
