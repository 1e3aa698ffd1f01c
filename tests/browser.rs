use isocookie::time::Timestamp;
use isocookie::{
    CookieDocument, CookieError, CookieOptions, CookieStore, DocumentCookies, MemoryDocument,
    RequestContext,
};

const COOKIE_NAME: &str = "test-cookie";

fn page() -> MemoryDocument {
    MemoryDocument::new(
        RequestContext::new()
            .path("/some/page")
            .host("example.com")
            .protocol("http:"),
    )
}

fn read(cookies: &DocumentCookies<MemoryDocument>, name: &str) -> Option<String> {
    cookies.read(name, &CookieOptions::new()).unwrap()
}

#[test]
fn returns_the_cookie_value() {
    let mut document = page();
    document.set_cookie("test-cookie=abc123;");
    let cookies = DocumentCookies::new(document);

    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("abc123"));
}

#[test]
fn decodes_the_value() {
    let mut document = page();
    document.set_cookie("test-cookie=!%22%C2%A7%24%25%26%2F()%3D%3F%22");
    let cookies = DocumentCookies::new(document);

    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("!\"§$%&/()=?\""));
}

#[test]
fn does_not_decode_when_raw() {
    let mut document = page();
    document.set_cookie("test-cookie=%22%C2%A7%24%25%26%2F%3D%3F");
    let cookies = DocumentCookies::new(document);

    assert_eq!(
        cookies
            .read(COOKIE_NAME, &CookieOptions::new().raw(true))
            .unwrap()
            .as_deref(),
        Some("%22%C2%A7%24%25%26%2F%3D%3F")
    );
}

#[test]
fn handles_invalid_cookies() {
    let mut document = page();
    document.set_cookie("=blank");
    let cookies = DocumentCookies::new(document);

    assert_eq!(read(&cookies, ""), None);
    assert!(cookies.read_all(&CookieOptions::new()).unwrap().is_empty());
}

#[test]
fn missing_cookie_is_none() {
    let cookies = DocumentCookies::new(page());

    assert_eq!(read(&cookies, "does-not-exist"), None);
}

#[test]
fn writes_the_value() {
    let document = page();
    let mut cookies = DocumentCookies::new(document.clone());

    cookies.write(COOKIE_NAME, "abc123", &CookieOptions::new()).unwrap();

    assert!(document.cookie().contains("test-cookie=abc123"));
    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("abc123"));
}

#[test]
fn encodes_the_value_unless_raw() {
    let value = "!\"§$%&/()=?\"";
    let document = page();
    let mut cookies = DocumentCookies::new(document.clone());

    cookies.write(COOKIE_NAME, value, &CookieOptions::new()).unwrap();
    assert!(document.cookie().contains("test-cookie=!%22%C2%A7%24%25%26%2F()%3D%3F%22"));

    cookies.write(COOKIE_NAME, value, &CookieOptions::new().raw(true)).unwrap();
    assert!(document.cookie().contains(&format!("test-cookie={value}")));
}

#[test]
fn assignments_carry_the_attributes() {
    let expires = Timestamp::from_second(1_893_456_000).unwrap();
    let document = page();
    let mut cookies = DocumentCookies::new(document.clone());

    cookies
        .write(COOKIE_NAME, "test", &CookieOptions::new().domain("example.com"))
        .unwrap();
    cookies
        .write(COOKIE_NAME, "test", &CookieOptions::new().expires(expires))
        .unwrap();
    cookies
        .write(COOKIE_NAME, "test", &CookieOptions::new().max_age(1000))
        .unwrap();
    cookies
        .write(COOKIE_NAME, "test", &CookieOptions::new().secure(true))
        .unwrap();
    cookies
        .write(
            COOKIE_NAME,
            "test",
            &CookieOptions::new().path("/sample-path").max_age(1000),
        )
        .unwrap();

    let assignments = document.assignments();
    assert!(assignments[0].contains("; domain=example.com"));
    assert!(assignments[1].contains("; expires=Tue, 01 Jan 2030 00:00:00 GMT"));
    assert!(assignments[2].contains("; max-age=1000"));
    assert!(assignments[3].contains("; secure"));
    assert!(assignments[4].contains("; path=/sample-path"));
    assert!(assignments[4].contains("; max-age=1000"));
}

#[test]
fn rejects_an_oversized_cookie() {
    let mut cookies = DocumentCookies::new(page());
    let large = "4ic1l5ar5cuo0tzmrmup".repeat(210);

    assert!(matches!(
        cookies.write(COOKIE_NAME, &large, &CookieOptions::new()),
        Err(CookieError::InvalidOptions(_))
    ));
    assert!(!cookies.exists(COOKIE_NAME));
}

#[test]
fn cookie_for_another_path_is_invisible() {
    let mut cookies = DocumentCookies::new(page());

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().path("/some-other-path"))
        .unwrap();

    assert_eq!(read(&cookies, COOKIE_NAME), None);
}

#[test]
fn cookie_for_the_same_path_is_visible() {
    let mut cookies = DocumentCookies::new(page());

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().path("/some/page"))
        .unwrap();

    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("value"));
}

#[test]
fn cookie_for_another_domain_is_invisible() {
    let mut cookies = DocumentCookies::new(page());

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().domain("another-domain.com"))
        .unwrap();

    assert_eq!(read(&cookies, COOKIE_NAME), None);
}

#[test]
fn cookie_for_a_parent_domain_is_visible() {
    let document = MemoryDocument::new(RequestContext::new().host("sub.example.com"));
    let mut cookies = DocumentCookies::new(document);

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().domain("example.com"))
        .unwrap();

    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("value"));
}

#[test]
fn expired_cookies_are_invisible() {
    let mut cookies = DocumentCookies::new(page());

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().expires(Timestamp::UNIX_EPOCH))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME), None);

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().max_age(-1))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME), None);
}

#[test]
fn unexpired_cookies_are_visible() {
    let tomorrow = Timestamp::from_second(Timestamp::now().as_second() + 86_400).unwrap();
    let mut cookies = DocumentCookies::new(page());

    cookies
        .write(COOKIE_NAME, "soon", &CookieOptions::new().expires(tomorrow))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("soon"));

    cookies
        .write(COOKIE_NAME, "later", &CookieOptions::new().max_age(99_999_999))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("later"));
}

#[test]
fn secure_cookie_on_an_insecure_page_is_invisible() {
    let mut cookies = DocumentCookies::new(page());

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().secure(true))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME), None);

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().secure(false))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("value"));
}

#[test]
fn clears_the_cookie() {
    let mut document = page();
    document.set_cookie("test-cookie=value;");
    let mut cookies = DocumentCookies::new(document);
    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("value"));

    cookies.clear(COOKIE_NAME, &CookieOptions::new()).unwrap();

    assert_eq!(read(&cookies, COOKIE_NAME), None);
}

#[test]
fn clears_a_cookie_written_without_path_using_its_default_path() {
    let mut cookies = DocumentCookies::new(page());
    cookies.write(COOKIE_NAME, "value", &CookieOptions::new()).unwrap();

    cookies
        .clear(COOKIE_NAME, &CookieOptions::new().path("/some"))
        .unwrap();

    assert_eq!(read(&cookies, COOKIE_NAME), None);
}

#[test]
fn clears_a_cookie_written_for_a_path() {
    let mut cookies = DocumentCookies::new(page());
    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().path("/some/page"))
        .unwrap();

    // without the path the clear targets another cookie
    cookies.clear(COOKIE_NAME, &CookieOptions::new()).unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME).as_deref(), Some("value"));

    cookies
        .clear(COOKIE_NAME, &CookieOptions::new().path("/some/page"))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME), None);
}

#[test]
fn clears_a_cookie_with_a_domain() {
    let mut cookies = DocumentCookies::new(page());

    cookies.write(COOKIE_NAME, "value", &CookieOptions::new()).unwrap();
    cookies
        .clear(COOKIE_NAME, &CookieOptions::new().domain("example.com"))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME), None);

    cookies
        .write(COOKIE_NAME, "value", &CookieOptions::new().domain("example.com"))
        .unwrap();
    cookies
        .clear(COOKIE_NAME, &CookieOptions::new().domain("example.com"))
        .unwrap();
    assert_eq!(read(&cookies, COOKIE_NAME), None);
}

#[test]
fn clears_all_cookies() {
    let mut document = page();
    document.set_cookie("test1=one");
    document.set_cookie("test2=two");
    let mut cookies = DocumentCookies::new(document);

    cookies.clear_all(&CookieOptions::new()).unwrap();

    assert_eq!(read(&cookies, "test1"), None);
    assert_eq!(read(&cookies, "test2"), None);
}

#[test]
fn exists() {
    let mut document = page();
    document.set_cookie("test-cookie=;");
    document.set_cookie("other=value");
    let cookies = DocumentCookies::new(document);

    assert!(cookies.exists(COOKIE_NAME));
    assert!(cookies.exists("other"));
    assert!(!cookies.exists("missing"));
}
