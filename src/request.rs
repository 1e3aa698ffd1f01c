//! Server-side cookie access for a single request/response cycle.
use crate::cache::WriteCache;
use crate::codec::{parse, serialize};
use crate::error::{CookieError, InvalidOptionsError};
use crate::options::CookieOptions;
use crate::store::CookieStore;
use biscotti::time::Timestamp;
use std::collections::BTreeMap;

/// What the server knows about the request being rendered.
///
/// Built once per request and never changed by cookie operations.
/// ```
/// use isocookie::RequestContext;
///
/// let request = RequestContext::new()
///     .path("/account")
///     .host("shop.example.com:8443")
///     .protocol("https")
///     .cookie_header("session=abc; theme=dark");
///
/// assert_eq!(request.hostname(), "shop.example.com");
/// assert!(request.is_https());
/// assert_eq!(request.cookies().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    path: String,
    host: String,
    protocol: String,
    cookies: BTreeMap<String, String>,
}

impl Default for RequestContext {
    fn default() -> Self {
        RequestContext {
            path: "/".to_string(),
            host: String::new(),
            protocol: "http".to_string(),
            cookies: BTreeMap::new(),
        }
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }
    #[inline]
    pub fn path<T: Into<String>>(mut self, path: T) -> Self {
        self.path = path.into();
        self
    }
    /// The `Host` the request was sent to, a port suffix is allowed
    #[inline]
    pub fn host<T: Into<String>>(mut self, host: T) -> Self {
        self.host = host.into();
        self
    }
    /// `http`, `https` or the URL style `https:`
    #[inline]
    pub fn protocol<T: Into<String>>(mut self, protocol: T) -> Self {
        self.protocol = protocol.into();
        self
    }
    /// Adds an inbound cookie. The value is kept exactly as the client sent it.
    #[inline]
    pub fn cookie<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }
    /// Adds every cookie found in a `Cookie` header value, malformed pairs are skipped
    pub fn cookie_header(mut self, header: &str) -> Self {
        for (name, value) in parse(header) {
            self.cookies.entry(name).or_insert(value);
        }
        self
    }

    pub fn get_path(&self) -> &str {
        &self.path
    }
    pub fn get_host(&self) -> &str {
        &self.host
    }
    pub fn get_protocol(&self) -> &str {
        &self.protocol
    }
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// The host without its port
    pub fn hostname(&self) -> &str {
        let host = self.host.as_str();
        if host.starts_with('[') {
            // IPv6 literal, e.g. `[::1]:8080`
            return match host.find(']') {
                Some(end) => &host[..=end],
                None => host,
            };
        }
        match host.rsplit_once(':') {
            Some((hostname, port)) if port.chars().all(|c| c.is_ascii_digit()) => hostname,
            _ => host,
        }
    }

    pub fn is_https(&self) -> bool {
        self.protocol
            .trim_end_matches(':')
            .eq_ignore_ascii_case("https")
    }
}

/// The response under construction, receiving one `Set-Cookie` value per write.
pub trait CookieResponse {
    /// Appends a raw `name=value; attr=...` header value
    fn append_set_cookie(&mut self, header_value: String);

    /// Structured variant for response APIs that build the header themselves.
    ///
    /// `value` is already encoded. Implementors forwarding to an API that expects
    /// `max_age` in milliseconds should use [CookieOptions::max_age_millis].
    fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) {
        self.append_set_cookie(serialize(name, value, options));
    }
}

impl CookieResponse for Vec<String> {
    fn append_set_cookie(&mut self, header_value: String) {
        self.push(header_value);
    }
}

/// Cookie access while rendering one request on the server.
///
/// Reads see the inbound cookies merged with whatever was written so far, filtered
/// by the scoping attributes each write was made with. Every write is also sent to
/// the [CookieResponse]. Build one per request and drop it once the response is sent.
#[derive(Debug)]
pub struct RequestCookies<R = Vec<String>> {
    request: RequestContext,
    cache: WriteCache,
    response: R,
    size_limit: Option<usize>,
}

impl<R: CookieResponse> RequestCookies<R> {
    pub fn new(request: RequestContext, response: R) -> Self {
        RequestCookies {
            request,
            cache: WriteCache::new(),
            response,
            size_limit: None,
        }
    }

    /// Rejects writes whose serialized form exceeds `limit` bytes, like a browser would.
    pub fn size_limit<T: Into<Option<usize>>>(mut self, limit: T) -> Self {
        self.size_limit = limit.into();
        self
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn response(&self) -> &R {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut R {
        &mut self.response
    }

    pub fn into_response(self) -> R {
        self.response
    }
}

impl<R: CookieResponse> CookieStore for RequestCookies<R> {
    fn visible_cookies(&self) -> BTreeMap<String, String> {
        self.cache.visible(&self.request, Timestamp::now())
    }

    fn persist(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        if let Some(limit) = self.size_limit {
            let size = serialize(name, value, options).len();
            if size > limit {
                return Err(InvalidOptionsError::TooLarge { size, limit }.into());
            }
        }

        self.cache.insert(name, value, options, Timestamp::now());
        self.response.set_cookie(name, value, options);

        Ok(())
    }
}
