//! Holds the cookie state of one request while it is being handled
use crate::error::CookieError;
use crate::options::CookieOptions;
use crate::request::{RequestContext, RequestCookies};
use crate::store::CookieStore;
use actix_utils::future::{Ready, ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// Request-scoped cookie access placed in the request extensions by
/// [CookieMiddleware](crate::CookieMiddleware).
///
/// Cloning is cheap and every clone sees the same cookies.
#[derive(Clone)]
pub struct Storage {
    pub(crate) cookies: Rc<RefCell<RequestCookies>>,
}

impl Storage {
    pub(crate) fn new(request: RequestContext, size_limit: Option<usize>) -> Self {
        Storage {
            cookies: Rc::new(RefCell::new(
                RequestCookies::new(request, Vec::new()).size_limit(size_limit),
            )),
        }
    }

    /// The request this storage was built for
    pub fn request(&self) -> RequestContext {
        self.cookies.borrow().request().clone()
    }

    pub(crate) fn take_set_cookie_headers(&self) -> Vec<String> {
        std::mem::take(self.cookies.borrow_mut().response_mut())
    }
}

impl CookieStore for Storage {
    fn visible_cookies(&self) -> BTreeMap<String, String> {
        self.cookies.borrow().visible_cookies()
    }

    fn persist(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        self.cookies.borrow_mut().persist(name, value, options)
    }
}

impl FromRequest for Storage {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Storage>() {
            Some(storage) => ready(Ok(storage.clone())),
            None => ready(Err(actix_web::error::ErrorInternalServerError(
                "Cookie storage is missing, is CookieMiddleware registered?",
            ))),
        }
    }
}
