use crate::options::CookieOptions;
use crate::request::RequestContext;
use biscotti::time::Timestamp;

/// Decides whether a cookie stored with `options` is visible to `request` at `now`.
///
/// `options` are expected to be normalized, i.e. `max_age` already folded into `expires`.
pub(crate) fn is_visible(
    options: &CookieOptions,
    request: &RequestContext,
    now: Timestamp,
) -> bool {
    path_matches(options.get_path(), request.get_path())
        && domain_matches(options.get_domain(), request.hostname())
        && !is_expired(options.get_expires(), now)
        && (!options.is_secure() || request.is_https())
}

fn path_matches(cookie_path: Option<&str>, request_path: &str) -> bool {
    cookie_path.is_none_or(|path| request_path.starts_with(path))
}

// Plain suffix match so a cookie set for `example.com` is sent to `sub.example.com`.
// Hostnames are case-insensitive.
pub(crate) fn domain_matches(cookie_domain: Option<&str>, hostname: &str) -> bool {
    cookie_domain.is_none_or(|domain| {
        hostname
            .to_ascii_lowercase()
            .ends_with(&domain.trim_start_matches('.').to_ascii_lowercase())
    })
}

fn is_expired(expires: Option<Timestamp>, now: Timestamp) -> bool {
    expires.is_some_and(|expires| expires < now)
}
