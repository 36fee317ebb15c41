//! Domain allow/deny filtering on request hosts.

/// Only/skip domain lists, normalized once at construction.
///
/// A host matches a domain when it equals the domain or is a subdomain of it
/// (`api.example.com` matches `example.com`, `badexample.com` does not).
/// Comparison is case-insensitive and internationalized domains are compared in
/// their punycode form; public-suffix boundaries are not consulted.
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    only: Vec<String>,
    skip: Vec<String>,
}

impl DomainFilter {
    pub fn new<S: AsRef<str>>(only: &[S], skip: &[S]) -> Self {
        Self {
            only: normalize_domains(only),
            skip: normalize_domains(skip),
        }
    }

    /// Keep iff (only empty OR host matches an only domain) AND
    /// (skip empty OR host matches no skip domain).
    pub fn allows(&self, host: &str) -> bool {
        let host = normalize_host(host);
        let included = self.only.is_empty() || self.only.iter().any(|d| host_matches(&host, d));
        let skipped = self.skip.iter().any(|d| host_matches(&host, d));
        included && !skipped
    }
}

/// True if `host` equals `domain` or ends with `.domain`. Both must already be normalized.
pub fn host_matches(host: &str, domain: &str) -> bool {
    match host.strip_suffix(domain) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

fn normalize_domains<S: AsRef<str>>(domains: &[S]) -> Vec<String> {
    domains
        .iter()
        .map(|d| {
            let d = d.as_ref().trim();
            let d = d.strip_prefix('.').unwrap_or(d);
            to_ascii_host(d.trim_end_matches('.'))
        })
        .filter(|d| !d.is_empty())
        .collect()
}

fn normalize_host(host: &str) -> String {
    to_ascii_host(host.trim_end_matches('.'))
}

/// Lowercased ASCII form of a host, with internationalized labels converted to
/// punycode so they compare equal to the hosts `url::Url` produces.
fn to_ascii_host(host: &str) -> String {
    if host.is_empty() {
        return String::new();
    }
    match url::Host::parse(host) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => host.to_ascii_lowercase(),
    }
}
