//! Referral resolver.
//!
//! Walks from the root authority along `whois:` referrals, collecting every
//! response in visitation order.

use std::collections::HashSet;

use super::client::QueryAuthority;
use super::referral::extract_referral;
use super::types::{Authority, Hop, HopOutcome, ResolutionTrail, TrailEnd};
use crate::config::{DEFAULT_MAX_HOPS, WHOIS_PORT};

/// Resolver settings.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// First authority queried
    pub root: Authority,
    /// Port used for every referred authority
    pub referral_port: u16,
    /// Maximum number of hops, root included
    pub max_hops: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            root: Authority::root(),
            referral_port: WHOIS_PORT,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

/// Follows WHOIS referrals for a query.
///
/// Each call owns its own trail and visited set; a `Resolver` can be shared
/// between connections behind an `Arc`.
#[derive(Debug)]
pub struct Resolver<C> {
    client: C,
    options: ResolverOptions,
}

impl<C: QueryAuthority> Resolver<C> {
    /// Creates a resolver starting at the IANA root.
    pub fn new(client: C) -> Self {
        Self::with_options(client, ResolverOptions::default())
    }

    /// Creates a resolver with explicit options.
    pub fn with_options(client: C, options: ResolverOptions) -> Self {
        Self { client, options }
    }

    /// Options in use.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Upstream client in use.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolves `query` and returns every response joined by a blank line.
    ///
    /// The query bytes are sent verbatim to every authority and the response
    /// bytes are returned untouched. Upstream failures never surface here:
    /// the answer is whatever was collected.
    pub async fn resolve(&self, query: &[u8]) -> Vec<u8> {
        self.resolve_trail(query).await.into_bytes()
    }

    /// Resolves `query` and returns the structured trail.
    ///
    /// The walk stops when a response holds no referral, when a hop fails,
    /// when a referral points back at an authority already visited, or after
    /// `max_hops` hops. The trail always holds at least the root's entry.
    pub async fn resolve_trail(&self, query: &[u8]) -> ResolutionTrail {
        let mut hops: Vec<Hop> = Vec::new();
        let mut visited: HashSet<Authority> = HashSet::new();
        let mut authority = self.options.root.clone();

        let end = loop {
            visited.insert(authority.clone());
            log::debug!("Querying {} (hop {})", authority, hops.len() + 1);

            let response = match self.client.query_authority(query, &authority).await {
                HopOutcome::Complete(response) => response,
                HopOutcome::Failed { partial, error } => {
                    log::warn!("{}", error);
                    if !partial.is_empty() || hops.is_empty() {
                        hops.push(Hop {
                            authority,
                            response: partial,
                        });
                    }
                    break TrailEnd::UpstreamFailure;
                }
            };

            log::trace!("{} answered:\n{}", authority, response.to_text_lossy());
            let next = extract_referral(response.as_bytes(), self.options.referral_port);
            hops.push(Hop {
                authority,
                response,
            });

            let Some(next) = next else {
                break TrailEnd::NoReferral;
            };
            if visited.contains(&next) {
                log::warn!("Referral to {} was already visited; stopping", next);
                break TrailEnd::ReferralCycle(next);
            }
            if hops.len() >= self.options.max_hops {
                log::warn!(
                    "Hop limit ({}) reached with a referral to {} pending; stopping",
                    self.options.max_hops,
                    next
                );
                break TrailEnd::HopLimit(next);
            }

            log::debug!("Following referral to {}", next);
            authority = next;
        };

        ResolutionTrail::new(hops, end)
    }
}
