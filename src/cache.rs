use crate::matcher::is_visible;
use crate::options::CookieOptions;
use crate::request::RequestContext;
use biscotti::time::Timestamp;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
struct CachedCookie {
    value: String,
    options: CookieOptions,
}

/// Cookies written while handling one request.
///
/// No response has reached the client yet, so the cache is what makes a read
/// that follows a write in the same request observe the written value.
#[derive(Debug, Default, Clone)]
pub struct WriteCache {
    entries: BTreeMap<String, CachedCookie>,
}

impl WriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a write, replacing any earlier write with the same name.
    ///
    /// `max_age` is stored as an absolute `expires` computed from `now`.
    pub fn insert(&mut self, name: &str, value: &str, options: &CookieOptions, now: Timestamp) {
        self.entries.insert(
            name.to_string(),
            CachedCookie {
                value: value.to_string(),
                options: options.normalized(now),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every cookie `request` can currently see.
    ///
    /// Inbound cookies are visible as presented. A cached write replaces the inbound
    /// cookie with the same name and is itself subject to the attribute matcher, so a
    /// write scoped away from the current request hides the inbound value as well.
    pub fn visible(&self, request: &RequestContext, now: Timestamp) -> BTreeMap<String, String> {
        let mut cookies: BTreeMap<String, String> = request
            .cookies()
            .iter()
            .filter(|(name, _)| !self.entries.contains_key(name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        for (name, cookie) in &self.entries {
            if is_visible(&cookie.options, request, now) {
                cookies.insert(name.clone(), cookie.value.clone());
            } else {
                tracing::trace!(
                    cookie = %name,
                    "Cached cookie is not visible to the current request"
                );
            }
        }

        cookies
    }
}
