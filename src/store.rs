//! The public read/write/clear/exists surface and the mode dispatcher.
use crate::codec::{decode, encode, is_valid_name, is_valid_raw_value};
use crate::document::{CookieDocument, DocumentCookies, MemoryDocument};
use crate::error::{CookieError, InvalidOptionsError};
use crate::options::CookieOptions;
use crate::request::{CookieResponse, RequestCookies, RequestContext};
use biscotti::time::Timestamp;
use std::collections::BTreeMap;

/// Cookie access shared by the browser document and the server-side request.
///
/// Implementors provide the two primitives, [visible_cookies](CookieStore::visible_cookies)
/// and [persist](CookieStore::persist). Option validation and value encoding are
/// done by the provided methods so every backing store behaves the same.
pub trait CookieStore {
    /// Every cookie visible right now, name to stored (still encoded) value
    fn visible_cookies(&self) -> BTreeMap<String, String>;

    /// Stores an already validated and encoded cookie.
    fn persist(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), CookieError>;

    /// Reads a single cookie, `Ok(None)` when it is absent or not visible.
    ///
    /// Only the `raw` option is accepted.
    fn read(&self, name: &str, options: &CookieOptions) -> Result<Option<String>, CookieError> {
        options.validate_read()?;

        let value = self.visible_cookies().remove(name);

        Ok(value.map(|value| decode_unless_raw(value, options)))
    }

    /// Reads every visible cookie. Only the `raw` option is accepted.
    fn read_all(&self, options: &CookieOptions) -> Result<BTreeMap<String, String>, CookieError> {
        options.validate_read()?;

        Ok(self
            .visible_cookies()
            .into_iter()
            .map(|(name, value)| (name, decode_unless_raw(value, options)))
            .collect())
    }

    /// Writes a cookie, percent-encoding the value unless `raw` is set.
    ///
    /// Fails for `http_only`, `signed`, or `expires` combined with `max_age`, for a
    /// name that could not be read back, and for a `raw` value that could not be sent.
    fn write(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        options.validate_write()?;
        if !is_valid_name(name) {
            return Err(InvalidOptionsError::InvalidName.into());
        }

        let value = if options.is_raw() {
            if !is_valid_raw_value(value) {
                return Err(InvalidOptionsError::InvalidValue.into());
            }
            value.to_string()
        } else {
            encode(value)
        };

        tracing::debug!(cookie = name, "Writing cookie");
        self.persist(name, &value, options)
    }

    /// Expires a cookie. `domain` and `path` must match the ones it was written with.
    ///
    /// `expires`, `max_age` and `raw` are rejected.
    fn clear(&mut self, name: &str, options: &CookieOptions) -> Result<(), CookieError> {
        options.validate_clear()?;

        let options = options.clone().expires(Timestamp::UNIX_EPOCH);

        tracing::debug!(cookie = name, "Clearing cookie");
        self.write(name, "", &options)
    }

    /// Clears every visible cookie using the same `domain`/`path` options.
    ///
    /// Returns the names cleared. Inbound cookies whose name cannot be written are skipped.
    fn clear_all(&mut self, options: &CookieOptions) -> Result<Vec<String>, CookieError> {
        options.validate_clear()?;

        let names: Vec<String> = self
            .visible_cookies()
            .into_keys()
            .filter(|name| is_valid_name(name))
            .collect();
        for name in &names {
            self.clear(name, options)?;
        }

        Ok(names)
    }

    /// `true` for any visible cookie, including one with an empty value
    fn exists(&self, name: &str) -> bool {
        self.visible_cookies().contains_key(name)
    }
}

fn decode_unless_raw(value: String, options: &CookieOptions) -> String {
    if options.is_raw() { value } else { decode(&value) }
}

/// What the host provides, decided once when [Cookies] is built
pub enum Environment<D, R> {
    /// A page with a live cookie string
    Browser(D),
    /// One server-side request whose response has not been sent yet
    Server { request: RequestContext, response: R },
}

/// A [CookieStore] backed by either a browser document or a server-side request.
pub enum Cookies<D = MemoryDocument, R = Vec<String>> {
    Document(DocumentCookies<D>),
    Request(RequestCookies<R>),
}

impl<D: CookieDocument, R: CookieResponse> Cookies<D, R> {
    pub fn new(environment: Environment<D, R>) -> Self {
        match environment {
            Environment::Browser(document) => Cookies::Document(DocumentCookies::new(document)),
            Environment::Server { request, response } => {
                Cookies::Request(RequestCookies::new(request, response))
            }
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Cookies::Request(_))
    }
}

impl<D: CookieDocument, R: CookieResponse> From<Environment<D, R>> for Cookies<D, R> {
    fn from(environment: Environment<D, R>) -> Self {
        Cookies::new(environment)
    }
}

impl<D: CookieDocument, R: CookieResponse> CookieStore for Cookies<D, R> {
    fn visible_cookies(&self) -> BTreeMap<String, String> {
        match self {
            Cookies::Document(cookies) => cookies.visible_cookies(),
            Cookies::Request(cookies) => cookies.visible_cookies(),
        }
    }

    fn persist(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        match self {
            Cookies::Document(cookies) => cookies.persist(name, value, options),
            Cookies::Request(cookies) => cookies.persist(name, value, options),
        }
    }
}
