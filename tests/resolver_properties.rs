//! Referral resolution properties, driven by scripted authorities.

mod helpers;

use helpers::ScriptedClient;
use whois_relay::whois::{Authority, Resolver, ResolverOptions, TrailEnd};

const ROOT: &str = "whois.iana.org";

#[tokio::test]
async fn test_root_without_referral_is_returned_unmodified() {
    let root_text = "% IANA WHOIS server\n\n% This query returned 0 objects.\n";
    let client = ScriptedClient::new().text(ROOT, root_text);
    let resolver = Resolver::new(client.clone());

    let trail = resolver.resolve_trail(b"nothing.invalid").await;
    assert_eq!(trail.len(), 1);
    assert_eq!(trail.end(), &TrailEnd::NoReferral);
    assert_eq!(trail.into_bytes(), root_text.as_bytes());
    assert_eq!(client.visited_hosts(), vec![ROOT]);
}

#[tokio::test]
async fn test_two_hop_referral_chain() {
    let root_text = "domain:       COM\n\nwhois: whois.example-registry.net\n\nstatus:       ACTIVE\n";
    let registry_text = "domain: EXAMPLE.COM\nstatus: active";
    let client = ScriptedClient::new()
        .text(ROOT, root_text)
        .text("whois.example-registry.net", registry_text);
    let resolver = Resolver::new(client.clone());

    let answer = resolver.resolve(b"example.com\n").await;

    assert_eq!(answer, format!("{}\n\n{}", root_text, registry_text).into_bytes());
    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1, Authority::new("whois.example-registry.net", 43));
}

#[tokio::test]
async fn test_chain_of_four_is_joined_in_visitation_order() {
    let client = ScriptedClient::new()
        .text(ROOT, "whois: whois.tld.net\n")
        .text("whois.tld.net", "whois: whois.registrar.net\n")
        .text("whois.registrar.net", "whois: whois.reseller.net\n")
        .text("whois.reseller.net", "registrant: Example Org");
    let resolver = Resolver::new(client.clone());

    let answer = resolver.resolve(b"example.net").await;

    assert_eq!(
        answer,
        b"whois: whois.tld.net\n\n\n\
         whois: whois.registrar.net\n\n\n\
         whois: whois.reseller.net\n\n\n\
         registrant: Example Org"
    );
    assert!(!answer.starts_with(b"\n\n"));
    assert!(!answer.ends_with(b"\n\n"));
    assert_eq!(
        client.visited_hosts(),
        vec![ROOT, "whois.tld.net", "whois.registrar.net", "whois.reseller.net"]
    );
}

#[tokio::test]
async fn test_same_query_is_sent_to_every_hop() {
    let client = ScriptedClient::new()
        .text(ROOT, "whois: whois.tld.net\n")
        .text("whois.tld.net", "done");
    let resolver = Resolver::new(client.clone());

    resolver.resolve(b"EXAMPLE.net \n").await;

    for (query, _) in client.calls() {
        assert_eq!(query, b"EXAMPLE.net \n");
    }
}

#[tokio::test]
async fn test_uppercase_referral_host_is_not_followed() {
    let root_text = "whois: WHOIS.EXAMPLE-REGISTRY.NET\n";
    let client = ScriptedClient::new()
        .text(ROOT, root_text)
        .text("whois.example-registry.net", "should not be reached");
    let resolver = Resolver::new(client.clone());

    let answer = resolver.resolve(b"example.com").await;

    assert_eq!(answer, root_text.as_bytes());
    assert_eq!(client.visited_hosts(), vec![ROOT]);
}

#[tokio::test]
async fn test_unreachable_referral_ends_chain_without_error() {
    let root_text = "whois: whois.down.net\n";
    let client = ScriptedClient::new()
        .text(ROOT, root_text)
        .unreachable("whois.down.net");
    let resolver = Resolver::new(client);

    let trail = resolver.resolve_trail(b"example.com").await;

    assert_eq!(trail.end(), &TrailEnd::UpstreamFailure);
    assert_eq!(trail.into_bytes(), root_text.as_bytes());
}

#[tokio::test]
async fn test_unreachable_root_yields_empty_answer() {
    let resolver = Resolver::new(ScriptedClient::new());
    assert!(resolver.resolve(b"example.com").await.is_empty());
}

#[tokio::test]
async fn test_partial_response_is_kept_and_not_followed() {
    let client = ScriptedClient::new()
        .text(ROOT, "whois: whois.flaky.net\n")
        .partial("whois.flaky.net", "domain: EXAMPLE.COM\nwhois: whois.next.net\n")
        .text("whois.next.net", "never queried");
    let resolver = Resolver::new(client.clone());

    let trail = resolver.resolve_trail(b"example.com").await;

    assert_eq!(trail.len(), 2);
    assert_eq!(trail.end(), &TrailEnd::UpstreamFailure);
    assert_eq!(client.visited_hosts(), vec![ROOT, "whois.flaky.net"]);
}

#[tokio::test]
async fn test_resolution_is_deterministic() {
    let client = ScriptedClient::new()
        .text(ROOT, "whois: whois.tld.net\n")
        .text("whois.tld.net", "domain: EXAMPLE.NET");
    let resolver = Resolver::new(client);

    let first = resolver.resolve(b"example.net").await;
    let second = resolver.resolve(b"example.net").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_referral_loop_terminates() {
    let client = ScriptedClient::new()
        .text(ROOT, "whois: whois.a.net\n")
        .text("whois.a.net", "whois: whois.b.net\n")
        .text("whois.b.net", "whois: whois.iana.org\n");
    let resolver = Resolver::new(client.clone());

    let trail = resolver.resolve_trail(b"example.com").await;

    assert_eq!(trail.len(), 3);
    assert_eq!(
        trail.end(),
        &TrailEnd::ReferralCycle(Authority::new(ROOT, 43))
    );
}

#[tokio::test]
async fn test_hop_cap_bounds_long_chains() {
    let mut client = ScriptedClient::new().text(ROOT, "whois: whois.h1.net\n");
    for i in 1..20 {
        let host = format!("whois.h{}.net", i);
        let text = format!("whois: whois.h{}.net\n", i + 1);
        client = client.text(&host, &text);
    }
    let resolver = Resolver::with_options(
        client.clone(),
        ResolverOptions {
            max_hops: 5,
            ..Default::default()
        },
    );

    let trail = resolver.resolve_trail(b"example.com").await;

    assert_eq!(trail.len(), 5);
    assert!(matches!(trail.end(), TrailEnd::HopLimit(_)));
    assert_eq!(client.calls().len(), 5);
}

#[tokio::test]
async fn test_concurrent_resolutions_do_not_share_state() {
    let client = ScriptedClient::new()
        .text(ROOT, "whois: whois.tld.net\n")
        .text("whois.tld.net", "domain: EXAMPLE.NET");
    let resolver = std::sync::Arc::new(Resolver::new(client));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = std::sync::Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve_trail(b"example.net").await })
        })
        .collect();

    for handle in handles {
        let trail = handle.await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.end(), &TrailEnd::NoReferral);
    }
}

#[tokio::test]
async fn test_non_utf8_bytes_are_relayed_and_referrals_still_found() {
    let root_text: &[u8] = b"organisation: Soci\xe9t\xe9\r\nwhois:        whois.nic.fr\r\n";
    let registry_text: &[u8] = b"address: Montr\xe9al";
    let client = ScriptedClient::new()
        .bytes(ROOT, root_text)
        .bytes("whois.nic.fr", registry_text);
    let resolver = Resolver::new(client.clone());

    let answer = resolver.resolve(b"caf\xe9.fr\n").await;

    assert_eq!(answer, [root_text, registry_text].join(&b"\n\n"[..]));
    for (query, _) in client.calls() {
        assert_eq!(query, b"caf\xe9.fr\n");
    }
}
