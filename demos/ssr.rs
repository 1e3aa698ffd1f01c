use actix_web::{get, App, HttpResponse, HttpServer};
use isocookie::cookies::{Cookie, CookieName, IncomingConfig, OutgoingConfig};
use isocookie::isocookie_macros::{cookie, FromRequest};
use isocookie::{CookieMiddleware, CookieOptions, CookieStore, Storage, MAX_COOKIE_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    HttpServer::new(move || {
        App::new()
            // Every request gets its own cookie storage, writes become Set-Cookie headers
            .wrap(CookieMiddleware::new().size_limit(MAX_COOKIE_SIZE))
            .service(render)
            .service(get_profile)
            .service(add_profile)
            .service(remove_profile)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Profile {
    pub name: String,
}

#[cookie(name = "__profile")]
pub struct ProfileCookie;

impl IncomingConfig for ProfileCookie {
    type Get = Profile;
}
impl OutgoingConfig for ProfileCookie {
    type Insert = (String, i32);

    fn serialize(values: Self::Insert) -> serde_json::Value {
        json!({
            "name": format!("{} ({})", values.0, values.1)
        })
    }

    fn options() -> CookieOptions {
        CookieOptions::new().path("/").max_age(60 * 60 * 24)
    }
}

#[derive(FromRequest)]
pub struct CookieCollection {
    profile: Cookie<ProfileCookie>,
}

// Renders a page the way a server-side renderer would: reads, writes, and reads again
// before any response has reached the browser.
#[get("/")]
async fn render(mut cookies: Storage) -> HttpResponse {
    let visits = cookies
        .read("visits", &CookieOptions::new())
        .ok()
        .flatten()
        .and_then(|visits| visits.parse::<u32>().ok())
        .unwrap_or(0);

    if let Err(e) = cookies.write("visits", &(visits + 1).to_string(), &CookieOptions::new().path("/")) {
        return HttpResponse::InternalServerError().body(e.to_string());
    }

    let all = cookies.read_all(&CookieOptions::new()).unwrap_or_default();
    HttpResponse::Ok().body(format!("cookies while rendering: {all:?}"))
}

#[get("/profile")]
async fn get_profile(cookies: CookieCollection) -> HttpResponse {
    match cookies.profile.get() {
        Ok(profile) => HttpResponse::Ok().body(format!("{profile:?}")),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}

#[get("/profile/add")]
async fn add_profile(cookies: CookieCollection) -> HttpResponse {
    if let Err(e) = cookies.profile.insert(("Scarlet".to_string(), 27)) {
        return HttpResponse::BadRequest().body(e.to_string());
    }

    // the write is already visible to this request
    HttpResponse::Ok().body(format!("{:?}", cookies.profile.get()))
}

#[get("/profile/remove")]
async fn remove_profile(cookies: CookieCollection) -> HttpResponse {
    match cookies.profile.remove() {
        Ok(()) => HttpResponse::Ok().body("__profile removed"),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}
