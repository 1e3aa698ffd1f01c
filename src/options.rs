use crate::error::InvalidOptionsError;
use biscotti::time::Timestamp;

/// Scoping and encoding options for a cookie.
///
/// The flag and lifetime setters accept `Into<Option<_>>`, so passing `None` unsets a previously set value.
/// ```
/// use isocookie::CookieOptions;
///
/// let options = CookieOptions::new().path("/admin").max_age(3600).secure(true);
/// assert_eq!(options.get_path(), Some("/admin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub(crate) domain: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) expires: Option<Timestamp>,
    pub(crate) max_age: Option<i64>,
    pub(crate) secure: Option<bool>,
    pub(crate) raw: Option<bool>,
    pub(crate) http_only: Option<bool>,
    pub(crate) signed: Option<bool>,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }
    #[inline]
    pub fn domain<T: Into<String>>(mut self, domain: T) -> Self {
        self.domain = Some(domain.into());
        self
    }
    #[inline]
    pub fn path<T: Into<String>>(mut self, path: T) -> Self {
        self.path = Some(path.into());
        self
    }
    #[inline]
    pub fn expires<T: Into<Option<Timestamp>>>(mut self, value: T) -> Self {
        self.expires = value.into();
        self
    }
    /// Lifetime in seconds. Zero or negative values expire the cookie immediately.
    #[inline]
    pub fn max_age<T: Into<Option<i64>>>(mut self, seconds: T) -> Self {
        self.max_age = seconds.into();
        self
    }
    #[inline]
    pub fn secure<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.secure = value.into();
        self
    }
    /// Skip percent-encoding on write and percent-decoding on read
    #[inline]
    pub fn raw<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.raw = value.into();
        self
    }
    /// Always rejected on write, see [InvalidOptionsError::HttpOnly]
    #[inline]
    pub fn http_only<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.http_only = value.into();
        self
    }
    /// Always rejected on write, see [InvalidOptionsError::Signed]
    #[inline]
    pub fn signed<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.signed = value.into();
        self
    }

    pub fn get_domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
    pub fn get_path(&self) -> Option<&str> {
        self.path.as_deref()
    }
    pub fn get_expires(&self) -> Option<Timestamp> {
        self.expires
    }
    pub fn get_max_age(&self) -> Option<i64> {
        self.max_age
    }
    pub fn is_secure(&self) -> bool {
        self.secure.unwrap_or(false)
    }
    pub fn is_raw(&self) -> bool {
        self.raw.unwrap_or(false)
    }

    /// `max_age` in milliseconds, for response APIs that expect it that way.
    pub fn max_age_millis(&self) -> Option<i64> {
        self.max_age.map(|seconds| seconds.saturating_mul(1000))
    }

    pub(crate) fn validate_write(&self) -> Result<(), InvalidOptionsError> {
        if self.http_only.unwrap_or(false) {
            return Err(InvalidOptionsError::HttpOnly);
        }
        if self.signed.unwrap_or(false) {
            return Err(InvalidOptionsError::Signed);
        }
        if self.expires.is_some() && self.max_age.is_some() {
            return Err(InvalidOptionsError::ExpiresAndMaxAge);
        }
        Ok(())
    }

    pub(crate) fn validate_clear(&self) -> Result<(), InvalidOptionsError> {
        if self.expires.is_some() {
            return Err(InvalidOptionsError::NotAllowedOnClear("expires"));
        }
        if self.max_age.is_some() {
            return Err(InvalidOptionsError::NotAllowedOnClear("max_age"));
        }
        if self.raw.is_some() {
            return Err(InvalidOptionsError::NotAllowedOnClear("raw"));
        }
        Ok(())
    }

    // Scoping attributes only apply to writes; the visible set is decided by the store.
    pub(crate) fn validate_read(&self) -> Result<(), InvalidOptionsError> {
        if self.domain.is_some() {
            return Err(InvalidOptionsError::NotAllowedOnRead("domain"));
        }
        if self.path.is_some() {
            return Err(InvalidOptionsError::NotAllowedOnRead("path"));
        }
        if self.expires.is_some() {
            return Err(InvalidOptionsError::NotAllowedOnRead("expires"));
        }
        if self.max_age.is_some() {
            return Err(InvalidOptionsError::NotAllowedOnRead("max_age"));
        }
        Ok(())
    }

    /// Folds `max_age` into an absolute `expires` relative to `now`.
    pub(crate) fn normalized(&self, now: Timestamp) -> Self {
        let mut options = self.clone();
        if let Some(seconds) = options.max_age.take() {
            options.expires = Some(expiry_after(now, seconds));
        }
        options
    }
}

fn expiry_after(now: Timestamp, seconds: i64) -> Timestamp {
    if seconds <= 0 {
        return Timestamp::UNIX_EPOCH;
    }
    Timestamp::from_second(now.as_second().saturating_add(seconds)).unwrap_or(Timestamp::MAX)
}
