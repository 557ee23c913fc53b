//! WHOIS referral resolution.
//!
//! This module provides:
//! - The upstream query client (one TCP exchange per hop, RFC 3912)
//! - Referral marker extraction from raw response bytes
//! - The resolver that chases referrals from the IANA root
//!
//! # Example
//!
//! ```no_run
//! use whois_relay::whois::{Resolver, TcpAuthorityClient};
//!
//! # async fn example() {
//! let resolver = Resolver::new(TcpAuthorityClient::new());
//! let answer = resolver.resolve(b"example.com").await;
//! println!("{}", String::from_utf8_lossy(&answer));
//! # }
//! ```

mod client;
mod referral;
mod resolver;
mod types;

// Re-export public API
pub use client::{QueryAuthority, TcpAuthorityClient};
pub use referral::{extract_referral, extract_referral_host};
pub use resolver::{Resolver, ResolverOptions};
pub use types::{Authority, Hop, HopOutcome, HopResponse, ResolutionTrail, TrailEnd};
