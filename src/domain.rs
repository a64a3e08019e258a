use psl::Type;
use std::net::IpAddr;
use url::{Host, Url};

/// Registrable domain (eTLD+1) of a tracker URL.
///
/// Subdomains are stripped using the ICANN section of the public suffix
/// list, so `https://tracker.example.co.uk/announce` yields `example.co.uk`
/// and `https://t.foo.duckdns.org/announce` yields `duckdns.org`. Hosts
/// that are IP addresses are returned unchanged. Returns `None` for strings
/// without a host, such as the `** [DHT] **` pseudo trackers.
pub fn top_domain(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let host = match url.host()? {
        Host::Ipv4(ip) => return Some(ip.to_string()),
        Host::Ipv6(ip) => return Some(ip.to_string()),
        // Non-special schemes such as `udp` keep the original case
        Host::Domain(domain) => domain.trim_end_matches('.').to_lowercase(),
    };
    if host.is_empty() {
        return None;
    }
    if host.parse::<IpAddr>().is_ok() {
        return Some(host);
    }
    let suffix = match icann_suffix(&host) {
        Some(suffix) => suffix,
        None => return Some(host),
    };
    let labels: Vec<&str> = host.split('.').collect();
    let suffix_labels = suffix.split('.').count();
    if labels.len() <= suffix_labels {
        // The host is itself a public suffix or a bare name
        return Some(host);
    }
    Some(labels[labels.len() - suffix_labels - 1..].join("."))
}

/// Public suffix of `host`, ignoring rules from the PRIVATE section.
///
/// A private suffix such as `duckdns.org` is walked up label by label until
/// an ICANN (or unlisted) suffix is found.
fn icann_suffix(host: &str) -> Option<String> {
    let mut name = host.to_string();
    loop {
        let suffix = psl::suffix(name.as_bytes())?;
        let text = std::str::from_utf8(suffix.as_bytes()).ok()?.to_string();
        if !matches!(suffix.typ(), Some(Type::Private)) {
            return Some(text);
        }
        match text.find('.') {
            Some(i) => name = text[i + 1..].to_string(),
            None => return Some(text),
        }
    }
}
