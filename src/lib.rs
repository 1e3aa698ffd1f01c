//! One cookie API for the browser and for server-side rendering.
//!
//! In a browser, cookies live in the page's cookie string. While rendering on the
//! server there is no browser yet: the cookies are the ones the request carried plus
//! whatever was written while handling it, and every write has to become a
//! `Set-Cookie` header. isocookie hides that difference behind [CookieStore].
//!
//! # Features
//! - `read`, `read_all`, `write`, `clear`, `clear_all` and `exists` with the same
//!   validation and percent-encoding in both environments
//! - Reads after a server-side write see the written value, filtered by its path,
//!   domain, secure and expiry attributes
//! - An actix-web [CookieMiddleware] and typed cookies through [cookies::Cookie]
//!
//! # Usage
//! ```
//! use isocookie::{CookieOptions, CookieStore, Cookies, Environment, RequestContext};
//!
//! let request = RequestContext::new()
//!     .path("/account")
//!     .host("example.com")
//!     .cookie_header("theme=dark");
//!
//! let mut cookies: Cookies = Cookies::new(Environment::Server { request, response: Vec::new() });
//!
//! cookies.write("session", "a b", &CookieOptions::new().path("/").max_age(3600)).unwrap();
//!
//! assert_eq!(cookies.read("session", &CookieOptions::new()).unwrap().as_deref(), Some("a b"));
//! assert!(cookies.exists("theme"));
//!
//! if let Cookies::Request(cookies) = cookies {
//!     assert_eq!(cookies.response(), &vec!["session=a%20b; max-age=3600; path=/".to_string()]);
//! }
//! ```
//!
//! With actix-web, register the middleware and take [Storage] in handlers:
//! ```no_run
//! use actix_web::{web, App, HttpServer, HttpResponse};
//! use isocookie::{CookieMiddleware, CookieOptions, CookieStore, Storage};
//!
//! async fn visit(mut cookies: Storage) -> HttpResponse {
//!     let visits = cookies
//!         .read("visits", &CookieOptions::new())
//!         .ok()
//!         .flatten()
//!         .and_then(|visits| visits.parse::<u32>().ok())
//!         .unwrap_or(0);
//!     match cookies.write("visits", &(visits + 1).to_string(), &CookieOptions::new().path("/")) {
//!         Ok(()) => HttpResponse::Ok().body(format!("visits: {}", visits + 1)),
//!         Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
//!     }
//! }
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     HttpServer::new(|| {
//!         App::new()
//!             .wrap(CookieMiddleware::new())
//!             .default_service(web::to(visit))
//!     })
//!     .bind(("127.0.0.1", 8080))?
//!     .run()
//!     .await
//! }
//! ```
mod cache;
pub mod codec;
pub mod cookies;
mod document;
mod error;
mod matcher;
mod middleware;
mod options;
mod request;
mod storage;
mod store;

pub use biscotti::time;
pub use cache::WriteCache;
pub use document::{CookieDocument, DocumentCookies, MAX_COOKIE_SIZE, MemoryDocument};
pub use error::{CookieError, InvalidOptionsError};
pub use isocookie_macros;
pub use middleware::CookieMiddleware;
pub use options::CookieOptions;
pub use request::{CookieResponse, RequestContext, RequestCookies};
pub use storage::Storage;
pub use store::{CookieStore, Cookies, Environment};
