//! Typed cookies on top of the request [Storage]
use crate::error::CookieError;
use crate::options::CookieOptions;
use crate::storage::Storage;
use crate::store::CookieStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::any::type_name;

/// A handle to one named cookie whose value is JSON encoded
pub struct Cookie<T> {
    storage: Storage,
    options: Option<CookieOptions>,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Cookie<T> {
    /// Create a cookie instance for any generic type parameter
    pub fn new(storage: &Storage) -> Self {
        Cookie {
            storage: storage.clone(),
            options: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Overrides the options from [OutgoingConfig::options] for this handle only
    pub fn with_options(mut self, options: CookieOptions) -> Self {
        self.options = Some(options);
        self
    }
}

impl<T: CookieName> Cookie<T> {
    /// `true` when the cookie is visible to the current request
    pub fn exists(&self) -> bool {
        self.storage.exists(T::COOKIE_NAME)
    }
}

/// Provide methods to `get` data from a cookie instance for any generic type parameter that implements [IncomingConfig]
impl<T: IncomingConfig> Cookie<T> {
    /// Reads the cookie named by [CookieName] and deserializes it into `T::Get`.
    ///
    /// Sees cookies written earlier in the same request.
    /// # Example
    /// ```no_run
    /// use isocookie::isocookie_macros::{cookie, FromRequest};
    /// use isocookie::cookies::{Cookie, CookieName, IncomingConfig};
    /// use actix_web::HttpResponse;
    ///
    /// #[cookie(name = "my-cookie")]
    /// pub struct MyCookie;
    ///
    /// impl IncomingConfig for MyCookie {
    ///     type Get = String;
    /// }
    ///
    /// #[derive(FromRequest)]
    /// pub struct CookieCollection(Cookie<MyCookie>);
    ///
    /// async fn get_cookie(cookie: CookieCollection) -> HttpResponse {
    ///     let _ = cookie.0.get();
    ///     HttpResponse::Ok().finish()
    /// }
    /// ```
    pub fn get(&self) -> Result<T::Get, CookieError> {
        let value = self
            .storage
            .read(T::COOKIE_NAME, &CookieOptions::new())?
            .ok_or(CookieError::NotFound(T::COOKIE_NAME.to_string()))?;

        serde_json::from_str(&value).map_err(|_| {
            CookieError::Deserialization(value.clone(), type_name::<T::Get>().to_string())
        })
    }
}

/// Provide methods to `insert` and `remove` a cookie instance for any generic type parameter that implements [OutgoingConfig]
impl<T: OutgoingConfig> Cookie<T> {
    fn options(&self) -> CookieOptions {
        match &self.options {
            Some(options) => options.clone(),
            None => T::options(),
        }
    }

    /// Serializes `value` and writes it, emitting a `Set-Cookie` header for the response.
    ///
    /// # Example
    /// ```no_run
    /// use isocookie::isocookie_macros::{cookie, FromRequest};
    /// use isocookie::cookies::{Cookie, CookieName, OutgoingConfig};
    /// use actix_web::HttpResponse;
    ///
    /// #[cookie(name = "my-cookie")]
    /// pub struct MyCookie;
    ///
    /// impl OutgoingConfig for MyCookie {
    ///     type Insert = String;
    /// }
    ///
    /// #[derive(FromRequest)]
    /// pub struct CookieCollection(Cookie<MyCookie>);
    ///
    /// async fn insert_cookie(cookie: CookieCollection) -> HttpResponse {
    ///     match cookie.0.insert("cookie value".to_string()) {
    ///         Ok(()) => HttpResponse::Ok().finish(),
    ///         Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    ///     }
    /// }
    /// ```
    pub fn insert(&self, value: T::Insert) -> Result<(), CookieError> {
        let data = T::serialize(value);

        let mut storage = self.storage.clone();
        storage.write(T::COOKIE_NAME, &data.to_string(), &self.options())
    }

    /// Clears the cookie using the domain and path of its options.
    pub fn remove(&self) -> Result<(), CookieError> {
        let options = self.options();
        // lifetime and raw options are rejected when clearing
        let scope = CookieOptions {
            domain: options.domain,
            path: options.path,
            ..CookieOptions::default()
        };

        let mut storage = self.storage.clone();
        storage.clear(T::COOKIE_NAME, &scope)
    }
}

/// Provide internal customization for `insert` and `remove` methods in [Cookie].
/// ```no_run
/// use isocookie::isocookie_macros::cookie;
/// use isocookie::cookies::{CookieName, OutgoingConfig};
/// use isocookie::CookieOptions;
///
/// #[cookie(name = "__my-cookie")]
/// pub struct MyCookie;
///
/// impl OutgoingConfig for MyCookie {
///    type Insert = String;
///
///    fn options() -> CookieOptions {
///        CookieOptions::new().path("/").max_age(3600)
///    }
/// }
/// ```
pub trait OutgoingConfig: CookieName {
    /// The serialization type when inserting a cookie to storage
    type Insert: Serialize;

    /// Provides default serialization for a cookie. This can be overwriting
    fn serialize(values: Self::Insert) -> Value {
        json!(values)
    }

    /// Options every write uses, none by default
    fn options() -> CookieOptions {
        CookieOptions::default()
    }
}

/// Provide internal customization for the `get` method in [Cookie].
pub trait IncomingConfig: CookieName {
    /// The deserialization type when getting a cookie from storage
    type Get: DeserializeOwned;
}

/// This is the base implementation of a cookie type
///
/// This is either implemented manually or with macro `#[cookie(name = "...")]`
pub trait CookieName {
    const COOKIE_NAME: &'static str;
}
