//! Input validation and URL normalization.
//!
//! The raw user input is either an IP literal, a domain name, or junk.
//! IP literals are accepted immediately; domains must match the
//! hostname grammar *and* resolve via DNS before they are trusted as a
//! fetch target. Everything else is rejected without a lookup.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// DNS lookups are bounded so a dead resolver cannot hang a run.
const DNS_TIMEOUT: Duration = Duration::from_secs(10);

static DOMAIN_RE: OnceLock<Regex> = OnceLock::new();

/// Hostname grammar: dot-separated labels of 1–63 alphanumeric/hyphen
/// characters, ending in a top-level label of at least two letters.
fn domain_pattern() -> &'static Regex {
    DOMAIN_RE.get_or_init(|| {
        Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$").unwrap()
    })
}

/// Shape of the raw input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Ip,
    Domain,
    Invalid,
}

impl TargetKind {
    /// Classify an input string without touching the network.
    pub fn of(input: &str) -> TargetKind {
        if input.parse::<IpAddr>().is_ok() {
            TargetKind::Ip
        } else if domain_pattern().is_match(input) {
            TargetKind::Domain
        } else {
            TargetKind::Invalid
        }
    }
}

/// A validated analysis target. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisTarget {
    raw: String,
    kind: TargetKind,
    base_url: String,
}

impl AnalysisTarget {
    /// The input string as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Scheme-qualified URL used as the fetch target and as the base
    /// for resolving relative links.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wrap a base URL the host already validated (e.g. a REST caller
    /// holding a known-good URL). Defaults the scheme like
    /// [`normalize`] does; fails on strings `Url` cannot parse.
    pub fn from_base_url(base: &str) -> Option<AnalysisTarget> {
        let base_url = ensure_scheme(base);
        let parsed = Url::parse(&base_url).ok()?;
        let host = parsed.host_str()?.to_string();
        Some(AnalysisTarget {
            kind: TargetKind::of(&host),
            raw: base.to_string(),
            base_url,
        })
    }
}

/// Seam for DNS resolution so tests can stub the lookup.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// True if the host resolves to at least one address.
    async fn resolve(&self, host: &str) -> bool;
}

/// System resolver via `tokio::net::lookup_host`, timeout-bounded.
#[derive(Debug, Clone, Default)]
pub struct DnsResolver;

#[async_trait]
impl Resolver for DnsResolver {
    async fn resolve(&self, host: &str) -> bool {
        // Port is irrelevant; lookup_host just needs a socket form.
        match tokio::time::timeout(DNS_TIMEOUT, tokio::net::lookup_host((host, 80))).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(e)) => {
                tracing::debug!(host, error = %e, "DNS resolution failed");
                false
            }
            Err(_) => {
                tracing::debug!(host, "DNS resolution timed out");
                false
            }
        }
    }
}

/// Validate a raw input and derive its base URL.
///
/// IP literals succeed immediately with `http://<input>` and no DNS
/// lookup. Domains cost exactly one lookup and succeed only if it
/// resolves. Failure is a normal negative result, never a panic.
pub async fn validate(input: &str) -> Option<AnalysisTarget> {
    validate_with_resolver(input, &DnsResolver).await
}

/// [`validate`] with an injected resolver.
pub async fn validate_with_resolver(input: &str, resolver: &dyn Resolver) -> Option<AnalysisTarget> {
    let kind = TargetKind::of(input);
    match kind {
        TargetKind::Ip => {}
        TargetKind::Domain => {
            if !resolver.resolve(input).await {
                return None;
            }
        }
        TargetKind::Invalid => return None,
    }
    Some(AnalysisTarget {
        raw: input.to_string(),
        kind,
        base_url: format!("http://{input}"),
    })
}

/// Resolve a possibly-relative link against a base, RFC 3986 rules.
///
/// A scheme-less base gets `http://` prefixed before resolution; an
/// absolute link passes through unchanged. An unparseable base falls
/// back to returning the link verbatim.
pub fn normalize(base: &str, href: &str) -> String {
    let base = ensure_scheme(base);
    match Url::parse(&base).and_then(|b| b.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}

fn ensure_scheme(base: &str) -> String {
    if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("http://{base}")
    }
}
