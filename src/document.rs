//! Browser-side cookie access through the page's cookie string.
use crate::codec::{parse, parse_set_cookie, serialize};
use crate::error::{CookieError, InvalidOptionsError};
use crate::matcher::{domain_matches, is_visible};
use crate::options::CookieOptions;
use crate::request::RequestContext;
use crate::store::CookieStore;
use biscotti::time::Timestamp;
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// Browsers refuse cookies whose serialized form is larger than this
pub const MAX_COOKIE_SIZE: usize = 4096;

/// The page's cookie string, `document.cookie` in a browser.
///
/// Reading returns every cookie visible to the page as `name=value; name2=value2`.
/// Assigning takes one `name=value; attr=...` string and lets the host decide how to
/// apply it.
pub trait CookieDocument {
    fn cookie(&self) -> String;
    fn set_cookie(&mut self, cookie: &str);
}

/// Cookie access backed by a [CookieDocument].
#[derive(Debug, Clone)]
pub struct DocumentCookies<D> {
    document: D,
}

impl<D: CookieDocument> DocumentCookies<D> {
    pub fn new(document: D) -> Self {
        DocumentCookies { document }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }
}

impl<D: CookieDocument> CookieStore for DocumentCookies<D> {
    fn visible_cookies(&self) -> BTreeMap<String, String> {
        parse(&self.document.cookie())
    }

    fn persist(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        let cookie = serialize(name, value, options);
        if cookie.len() > MAX_COOKIE_SIZE {
            return Err(InvalidOptionsError::TooLarge {
                size: cookie.len(),
                limit: MAX_COOKIE_SIZE,
            }
            .into());
        }

        self.document.set_cookie(&cookie);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct StoredCookie {
    name: String,
    value: String,
    options: CookieOptions,
}

impl StoredCookie {
    fn same_slot(&self, other: &StoredCookie) -> bool {
        self.name == other.name
            && self.options.domain == other.options.domain
            && self.options.path == other.options.path
    }
}

#[derive(Debug)]
struct Jar {
    location: RequestContext,
    cookies: Vec<StoredCookie>,
    assignments: Vec<String>,
}

/// An in-memory [CookieDocument] that applies assignments the way a browser does
/// for a page at `location`.
///
/// Cookies are keyed by name, domain and path. A missing path defaults to the
/// directory of the location path and a missing domain to its hostname. An
/// assignment that is already expired deletes the matching cookie. Reading only
/// returns cookies visible to the location.
///
/// Clones share the same jar, so a test can keep a handle after giving one away.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    jar: Rc<RefCell<Jar>>,
}

impl MemoryDocument {
    pub fn new(location: RequestContext) -> Self {
        MemoryDocument {
            jar: Rc::new(RefCell::new(Jar {
                location,
                cookies: Vec::new(),
                assignments: Vec::new(),
            })),
        }
    }

    pub fn location(&self) -> RequestContext {
        self.jar.borrow().location.clone()
    }

    /// Moves the page, as if the user navigated within the same jar
    pub fn navigate(&self, location: RequestContext) {
        self.jar.borrow_mut().location = location;
    }

    /// Every raw string assigned so far, oldest first
    pub fn assignments(&self) -> Vec<String> {
        self.jar.borrow().assignments.clone()
    }
}

impl CookieDocument for MemoryDocument {
    fn cookie(&self) -> String {
        let jar = self.jar.borrow();
        let now = Timestamp::now();

        jar.cookies
            .iter()
            .filter(|cookie| is_visible(&cookie.options, &jar.location, now))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn set_cookie(&mut self, cookie: &str) {
        let mut jar = self.jar.borrow_mut();
        jar.assignments.push(cookie.to_string());

        let Some((name, value, options)) = parse_set_cookie(cookie) else {
            tracing::warn!("Ignoring malformed cookie assignment");
            return;
        };

        let hostname = jar.location.hostname().to_ascii_lowercase();
        if let Some(domain) = options.get_domain() {
            if !domain_matches(Some(domain), &hostname) {
                tracing::debug!(cookie = %name, domain, "Ignoring cookie for a foreign domain");
                return;
            }
        }

        let now = Timestamp::now();
        let mut options = options.normalized(now);
        options.domain = Some(match options.domain.take() {
            Some(domain) => domain.trim_start_matches('.').to_ascii_lowercase(),
            None => hostname,
        });
        if options.path.is_none() {
            options.path = Some(default_path(jar.location.get_path()).to_string());
        }

        let stored = StoredCookie { name, value, options };
        jar.cookies.retain(|existing| !existing.same_slot(&stored));

        if stored.options.expires.is_some_and(|expires| expires < now) {
            return;
        }
        jar.cookies.push(stored);
    }
}

// The directory of the request path: everything up to, not including, the last `/`.
fn default_path(path: &str) -> &str {
    if !path.starts_with('/') {
        return "/";
    }
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(end) => &path[..end],
    }
}
