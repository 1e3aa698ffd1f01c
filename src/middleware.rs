use actix_web::{
    dev::{forward_ready, ResponseHead, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, COOKIE, SET_COOKIE},
    HttpMessage,
};
use anyhow::anyhow;
use std::{future::Future, pin::Pin, rc::Rc};
use actix_utils::future::{ready, Ready};

use crate::request::RequestContext;
use crate::Storage;

/// Gives every request its own [Storage] and turns the writes made while
/// handling it into `Set-Cookie` headers.
#[derive(Default, Clone)]
pub struct CookieMiddleware {
    size_limit: Option<usize>,
}

impl CookieMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes larger than `limit` bytes, see [MAX_COOKIE_SIZE](crate::MAX_COOKIE_SIZE)
    pub fn size_limit<T: Into<Option<usize>>>(mut self, limit: T) -> Self {
        self.size_limit = limit.into();
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = InnerCookieMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InnerCookieMiddleware {
            service: Rc::new(service),
            size_limit: self.size_limit,
        }))
    }
}

pub fn e500<T>(e: T) -> actix_web::Error
where
    T: std::fmt::Debug + std::fmt::Display + 'static,
{
    actix_web::error::ErrorInternalServerError(e)
}

pub struct InnerCookieMiddleware<S> {
    service: Rc<S>,
    size_limit: Option<usize>,
}

impl<S, B> Service<ServiceRequest> for InnerCookieMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let storage = Storage::new(request_context(&req), self.size_limit);

        Box::pin(async move {
            // cloning storage only copies the rc
            req.extensions_mut().insert(storage.clone());

            let mut response = service.call(req).await?;

            process_response_cookies(response.response_mut().head_mut(), &storage).map_err(e500)?;

            Ok(response)
        })
    }
}

// Malformed cookie data comes from the client, so it is skipped rather than rejected.
fn request_context(req: &ServiceRequest) -> RequestContext {
    let connection = req.connection_info();
    let mut request = RequestContext::new()
        .path(req.path())
        .host(connection.host())
        .protocol(connection.scheme());

    for header in req.headers().get_all(COOKIE) {
        match header.to_str() {
            Ok(header) => request = request.cookie_header(header),
            Err(e) => tracing::warn!("Ignoring cookie header with invalid encoding: {e}"),
        }
    }

    request
}

fn process_response_cookies(
    response: &mut ResponseHead,
    storage: &Storage,
) -> Result<(), anyhow::Error> {
    for cookie in storage.take_set_cookie_headers() {
        let header = HeaderValue::from_str(&cookie).map_err(|e| {
            anyhow!("Failed to attach `{}` to the outgoing response: {}", cookie, e)
        })?;
        tracing::debug!(header = %cookie, "Appending Set-Cookie header");
        response.headers_mut().append(SET_COOKIE, header);
    }

    Ok(())
}
