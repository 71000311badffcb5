//! Syntactic validation of lookup input
//!
//! Two pure predicates decide whether a string is an IPv4 literal or looks like
//! a domain name. Neither touches the network: a domain that passes here may
//! still fail to resolve upstream.

/// Maximum length of a domain name after normalization
pub const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single label
pub const MAX_LABEL_LEN: usize = 63;

/// Check whether `s` is a dotted-quad IPv4 literal
///
/// Exactly four decimal octets of one to three digits, each in `0..=255`.
/// Leading zeros are accepted (`010.0.0.1`). The whole string must match, so
/// surrounding whitespace is rejected.
///
/// ```
/// use ipgeo::lens::target::is_ipv4_literal;
///
/// assert!(is_ipv4_literal("192.168.1.1"));
/// assert!(!is_ipv4_literal("256.1.1.1"));
/// assert!(!is_ipv4_literal("1.2.3"));
/// ```
pub fn is_ipv4_literal(s: &str) -> bool {
    let mut octets = 0;
    for octet in s.split('.') {
        octets += 1;
        if octets > 4 || !is_octet(octet) {
            return false;
        }
    }
    octets == 4
}

fn is_octet(s: &str) -> bool {
    (1..=3).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_digit())
        && s.parse::<u16>().is_ok_and(|v| v <= 255)
}

/// Reduce pasted input to the host part that should be validated as a domain
///
/// Trims whitespace, then strips in order: a leading URI scheme
/// (`letter (letter|digit|+|-|.)* "://"`), a leading `www.`, everything from
/// the first `/`, `?` or `#`, and a trailing `:port`.
///
/// ```
/// use ipgeo::lens::target::normalize_domain;
///
/// assert_eq!(normalize_domain("https://www.example.com:8443/path?x=1"), "example.com");
/// assert_eq!(normalize_domain("  localhost  "), "localhost");
/// ```
pub fn normalize_domain(s: &str) -> &str {
    let mut host = strip_scheme(s.trim());

    if host
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."))
    {
        host = &host[4..];
    }

    if let Some(idx) = host.find(|c: char| matches!(c, '/' | '?' | '#')) {
        host = &host[..idx];
    }

    if let Some((name, port)) = host.rsplit_once(':') {
        if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
            host = name;
        }
    }

    host
}

fn strip_scheme(s: &str) -> &str {
    let Some(idx) = s.find("://") else {
        return s;
    };

    let mut scheme = s[..idx].chars();
    let valid = scheme.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid {
        &s[idx + 3..]
    } else {
        s
    }
}

/// Check whether `s` looks like a domain name once normalized
///
/// See [`normalize_domain`] for the accepted decorations. A single label such
/// as `localhost` is accepted; multi-label names need a final label of at
/// least two characters containing a letter. Only ASCII letters, digits and
/// hyphens are label characters, so IDN input must already be punycode.
///
/// ```
/// use ipgeo::lens::target::is_domain_like;
///
/// assert!(is_domain_like("https://www.example.com/path?x=1"));
/// assert!(is_domain_like("localhost"));
/// assert!(!is_domain_like("example.12"));
/// ```
pub fn is_domain_like(s: &str) -> bool {
    let domain = normalize_domain(s);

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return false;
    }
    if domain.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    match labels.split_last() {
        Some((single, [])) => is_host_label(single),
        Some((tld, rest)) => {
            rest.iter().chain(std::iter::once(tld)).all(|l| is_label(l))
                && tld.len() >= 2
                && tld.bytes().any(|b| b.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// A bare hostname: alphanumeric at both ends, hyphens only inside
fn is_host_label(label: &str) -> bool {
    is_label(label)
        && label
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_alphanumeric())
        && label
            .bytes()
            .last()
            .is_some_and(|b| b.is_ascii_alphanumeric())
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}
