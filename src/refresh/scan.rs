use std::sync::LazyLock;

use regex::Regex;

/// Identity provider domains whose sign-in links are opened automatically.
pub const IDP_DOMAINS: [&str; 2] = ["oktapreview.com", "okta.com"];

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://[A-Za-z0-9./=?_-]+").expect("url pattern is valid")
});

/// First sign-in URL in a line of refresh-tool output.
///
/// Lines that mention none of [`IDP_DOMAINS`] are never searched.
pub fn login_url(line: &str) -> Option<&str> {
    if !IDP_DOMAINS.iter().any(|domain| line.contains(domain)) {
        return None;
    }
    URL_PATTERN.find(line).map(|m| m.as_str())
}
