//! The flat cookie string format: `name=value; name2=value2` for reads and
//! `name=value; attr=...` for writes.
use crate::options::CookieOptions;
use biscotti::time::{Timestamp, civil::DateTime, tz::TimeZone};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::collections::BTreeMap;

/// Characters left untouched by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parses a `Cookie` header style string into name/value pairs.
///
/// Empty segments, segments without `=` and entries with an empty name are skipped.
/// When a name repeats, the first occurrence wins.
pub fn parse(raw: &str) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();

    for cookie in raw.split(';') {
        if cookie.chars().all(char::is_whitespace) {
            continue;
        }
        let Some((name, value)) = cookie.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    cookies
}

/// Whether `name` survives [parse] unchanged
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || c == '=' || c == ';')
}

/// Whether a value written with `raw` can be sent as is in a `Set-Cookie` header
pub(crate) fn is_valid_raw_value(value: &str) -> bool {
    !value
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || matches!(c, ';' | ',' | '\\'))
}

/// Builds a single `Set-Cookie` style assignment.
///
/// Attributes are appended in a fixed order: domain, expires, max-age, secure, path.
pub fn serialize(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut cookie = format!("{name}={value}");

    if let Some(domain) = &options.domain {
        cookie.push_str("; domain=");
        cookie.push_str(domain);
    }
    if let Some(expires) = options.expires {
        cookie.push_str("; expires=");
        cookie.push_str(&format_expires(expires));
    }
    if let Some(max_age) = options.max_age {
        cookie.push_str(&format!("; max-age={max_age}"));
    }
    if options.is_secure() {
        cookie.push_str("; secure");
    }
    if let Some(path) = &options.path {
        cookie.push_str("; path=");
        cookie.push_str(path);
    }

    cookie
}

/// Percent-encodes a value the way `encodeURIComponent` does
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Percent-decodes a value. Sequences that do not decode to UTF-8 leave the value untouched.
pub fn decode(value: &str) -> String {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            tracing::warn!("Leaving cookie value undecoded: {e}");
            value.to_string()
        }
    }
}

/// Formats a timestamp as an IMF-fixdate, e.g. `Thu, 01 Jan 1970 00:00:00 GMT`
pub fn format_expires(expires: Timestamp) -> String {
    expires.strftime(EXPIRES_FORMAT).to_string()
}

pub(crate) fn parse_expires(raw: &str) -> Option<Timestamp> {
    let datetime = DateTime::strptime(EXPIRES_FORMAT, raw.trim()).ok()?;
    datetime
        .to_zoned(TimeZone::UTC)
        .ok()
        .map(|zoned| zoned.timestamp())
}

/// Parses a single `name=value; attr=...` assignment as written by [serialize].
///
/// Unknown attributes are ignored. Returns `None` when there is no `name=value` pair.
pub fn parse_set_cookie(raw: &str) -> Option<(String, String, CookieOptions)> {
    let mut segments = raw.split(';');
    let (name, value) = segments.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut options = CookieOptions::new();
    for attribute in segments {
        let (key, val) = match attribute.split_once('=') {
            Some((key, val)) => (key.trim(), val.trim()),
            None => (attribute.trim(), ""),
        };
        match key.to_ascii_lowercase().as_str() {
            "domain" if !val.is_empty() => {
                options = options.domain(val.trim_start_matches('.'));
            }
            "path" if !val.is_empty() => {
                options = options.path(val);
            }
            "expires" => {
                options = options.expires(parse_expires(val));
            }
            "max-age" => {
                options = options.max_age(val.parse::<i64>().ok());
            }
            "secure" => {
                options = options.secure(true);
            }
            _ => {}
        }
    }

    Some((name.to_string(), value.trim().to_string(), options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_names() {
        assert!(is_valid_name("test-cookie"));
        assert!(is_valid_name("type_a"));

        for name in ["", "Type A", "a=b", "a;b", "a\tb", "a\r\n"] {
            assert!(!is_valid_name(name), "{name:?}");
        }
    }

    #[test]
    fn raw_values() {
        assert!(is_valid_raw_value(""));
        assert!(is_valid_raw_value("a%20b"));
        assert!(is_valid_raw_value("!\"§$%&/()=?\""));

        for value in ["a\r\nX-Injected: 1", "a b", "a;b", "a,b", "a\\b", "\u{7f}"] {
            assert!(!is_valid_raw_value(value), "{value:?}");
        }
    }

    #[test]
    fn parses_pairs_and_trims() {
        let cookies = parse("a=1;  b = two ; c=");

        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
        assert_eq!(cookies.get("b").map(String::as_str), Some("two"));
        assert_eq!(cookies.get("c").map(String::as_str), Some(""));
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn splits_on_first_equal_sign() {
        let cookies = parse("token=abc==; q=a=b");

        assert_eq!(cookies["token"], "abc==");
        assert_eq!(cookies["q"], "a=b");
    }

    #[test]
    fn skips_malformed_entries() {
        assert!(parse("=blank").is_empty());
        assert!(parse(";;  ; novalue").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn serializes_bare_pair() {
        assert_eq!(serialize("test-cookie", "abc123", &CookieOptions::new()), "test-cookie=abc123");
    }

    #[test]
    fn serializes_attributes_in_fixed_order() {
        let options = CookieOptions::new()
            .path("/sample-path")
            .secure(true)
            .max_age(1000)
            .domain("example.com");

        assert_eq!(
            serialize("name", "value", &options),
            "name=value; domain=example.com; max-age=1000; secure; path=/sample-path"
        );
    }

    #[test]
    fn serializes_expires_as_utc_string() {
        let options = CookieOptions::new().expires(Timestamp::UNIX_EPOCH);

        assert_eq!(
            serialize("name", "", &options),
            "name=; expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn secure_false_is_omitted() {
        let options = CookieOptions::new().secure(false);

        assert_eq!(serialize("name", "value", &options), "name=value");
    }

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode("!\"§$%&/()=?\""), "!%22%C2%A7%24%25%26%2F()%3D%3F%22");
        assert_eq!(encode("a b;c"), "a%20b%3Bc");
        assert_eq!(encode("plain-value_1.0~*'"), "plain-value_1.0~*'");
    }

    #[test]
    fn decode_reverses_encode() {
        let value = "!\"§$%&/()=?\" ünïcödé; x=1";

        assert_eq!(decode(&encode(value)), value);
    }

    #[test]
    fn decode_leaves_invalid_utf8_alone() {
        assert_eq!(decode("%C3%28"), "%C3%28");
    }

    #[test]
    fn expires_round_trips_through_the_wire_format() {
        let expires = Timestamp::from_second(1_705_276_800).unwrap();
        let formatted = format_expires(expires);

        assert_eq!(formatted, "Mon, 15 Jan 2024 00:00:00 GMT");
        assert_eq!(parse_expires(&formatted), Some(expires));
    }

    #[test]
    fn parses_set_cookie_assignment() {
        let (name, value, options) = parse_set_cookie(
            "name=val; domain=.example.com; max-age=10; secure; path=/a; SameSite=Lax",
        )
        .unwrap();

        assert_eq!(name, "name");
        assert_eq!(value, "val");
        assert_eq!(options.get_domain(), Some("example.com"));
        assert_eq!(options.get_max_age(), Some(10));
        assert!(options.is_secure());
        assert_eq!(options.get_path(), Some("/a"));
    }

    #[test]
    fn set_cookie_without_pair_is_rejected() {
        assert_eq!(parse_set_cookie("=blank"), None);
        assert_eq!(parse_set_cookie("secure"), None);
    }
}
