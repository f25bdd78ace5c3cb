//! Structural URL validation
//!
//! Accepts `scheme://host[:port][/path][?query]` where:
//! - scheme is `http` or `https` (any case)
//! - host is a DNS name ending in a 2-6 letter top-level label (optionally
//!   followed by a trailing dot), the literal `localhost`, or a dotted
//!   IPv4 literal
//! - port is `:` followed by one or more digits
//! - the remainder is empty, a lone `/`, or `/`/`?` followed by
//!   non-whitespace text

/// Kind of host accepted by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Dot-separated DNS labels with an alphabetic top-level label
    Domain,
    /// The literal `localhost`
    Localhost,
    /// Four dot-separated groups of 1-3 digits
    Ipv4,
}

/// Components of a structurally valid URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub host: &'a str,
    pub host_kind: HostKind,
    pub port: Option<&'a str>,
    pub rest: &'a str,
}

/// Returns true if `url` matches the accepted URL grammar
pub fn is_valid_url(url: &str) -> bool {
    parse_url(url).is_some()
}

/// Split `url` into its components, or `None` if it does not match the grammar
pub fn parse_url(url: &str) -> Option<UrlParts<'_>> {
    let (scheme, after_scheme) = url.split_once("://")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    let authority_end = after_scheme
        .find(|c| c == '/' || c == '?')
        .unwrap_or(after_scheme.len());
    let (authority, rest) = after_scheme.split_at(authority_end);

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };

    if let Some(port) = port {
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let host_kind = host_kind(host)?;

    if !is_valid_rest(rest) {
        return None;
    }

    Some(UrlParts {
        scheme,
        host,
        host_kind,
        port,
        rest,
    })
}

fn host_kind(host: &str) -> Option<HostKind> {
    if is_domain(host) {
        Some(HostKind::Domain)
    } else if host.eq_ignore_ascii_case("localhost") {
        Some(HostKind::Localhost)
    } else if is_ipv4(host) {
        Some(HostKind::Ipv4)
    } else {
        None
    }
}

/// One or more DNS labels followed by a 2-6 letter TLD and an optional trailing dot
fn is_domain(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    let Some((labels, tld)) = host.rsplit_once('.') else {
        return false;
    };

    let tld_ok = (2..=6).contains(&tld.len()) && tld.bytes().all(|b| b.is_ascii_alphabetic());
    tld_ok && labels.split('.').all(is_dns_label)
}

/// 1-63 alphanumerics or hyphens, not starting or ending with a hyphen
fn is_dns_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= 63
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

fn is_ipv4(host: &str) -> bool {
    let groups: Vec<&str> = host.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
}

fn is_valid_rest(rest: &str) -> bool {
    if rest.is_empty() || rest == "/" {
        return true;
    }
    // `rest` starts with '/' or '?' here; a lone '?' has no query text
    rest.len() > 1 && !rest.chars().any(char::is_whitespace)
}
