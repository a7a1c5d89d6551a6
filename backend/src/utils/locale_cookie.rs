//! Locale cookie codec
//!
//! The front end stores the user's language (and optionally time zone) in a
//! cookie shaped like `%22pt_BR America/Sao_Paulo%22`. `%22` is a literal
//! three-character sentinel bracketing the value, not a percent-escape.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};
use cookie::Cookie;
use cookie::time::{Duration, OffsetDateTime};

use super::i18n::{LocaleContext, LocaleTag, TimeZoneId};

pub const QUOTE: &str = "%22";
pub const COOKIE_NAME: &str = "NG_TRANSLATE_LANG_KEY";
pub const COOKIE_PATH: &str = "/";
pub const LANGUAGE_PARAM: &str = "language";

/// Marker written in place of an absent locale
const NO_LOCALE: &str = "-";

/// Serialize a context into a cookie value.
pub fn encode(ctx: &LocaleContext) -> String {
    let locale = ctx
        .locale()
        .map(ToString::to_string)
        .unwrap_or_else(|| NO_LOCALE.to_string());

    match ctx.time_zone() {
        Some(zone) => format!("{QUOTE}{locale} {}{QUOTE}", zone.id()),
        None => format!("{QUOTE}{locale}{QUOTE}"),
    }
}

/// Parse a cookie value. Malformed fragments decode as absent, never as errors.
pub fn decode(value: &str) -> LocaleContext {
    let value = value.replace(QUOTE, "");
    if value.is_empty() {
        return LocaleContext::empty();
    }

    let (locale_part, time_zone_part) = match value.split_once(' ') {
        Some((locale, zone)) => (locale, Some(zone)),
        None => (value.as_str(), None),
    };

    let locale = if locale_part == NO_LOCALE || locale_part.is_empty() {
        None
    } else {
        LocaleTag::parse_lenient(&locale_part.replace('-', "_"))
    };
    let time_zone = time_zone_part.map(TimeZoneId::parse_lenient);

    LocaleContext::new(locale, time_zone)
}

/// First cookie named `name` across all `Cookie` headers
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// `Set-Cookie` value for a session cookie scoped to the application root
pub fn set_cookie(name: &str, value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let cookie = Cookie::build((name, value)).path(COOKIE_PATH).build();
    HeaderValue::from_str(&cookie.to_string())
}

/// `Set-Cookie` value that makes the browser drop the cookie immediately
pub fn expired_cookie(name: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let cookie = Cookie::build((name, ""))
        .path(COOKIE_PATH)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build();
    HeaderValue::from_str(&cookie.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(locale: Option<&str>, zone: Option<&str>) -> LocaleContext {
        LocaleContext::new(
            locale.map(|l| LocaleTag::parse(l).unwrap()),
            zone.map(|z| TimeZoneId::parse(z).unwrap()),
        )
    }

    #[test]
    fn test_encode_formats() {
        assert_eq!(encode(&ctx(Some("pt_BR"), None)), "%22pt_BR%22");
        assert_eq!(
            encode(&ctx(Some("en"), Some("America/Sao_Paulo"))),
            "%22en America/Sao_Paulo%22"
        );
        assert_eq!(encode(&ctx(None, Some("Europe/Paris"))), "%22- Europe/Paris%22");
        assert_eq!(encode(&LocaleContext::empty()), "%22-%22");
    }

    #[test]
    fn test_round_trip_locale_only() {
        for locale in ["en", "pt_BR", "fr", "de_AT"] {
            let original = ctx(Some(locale), None);
            assert_eq!(decode(&encode(&original)), original);
        }
    }

    #[test]
    fn test_round_trip_locale_and_zone() {
        let pairs = [("en", "America/Sao_Paulo"), ("pt_BR", "America/Manaus"), ("ja", "Asia/Tokyo")];
        for (locale, zone) in pairs {
            let original = ctx(Some(locale), Some(zone));
            assert_eq!(decode(&encode(&original)), original);
        }
    }

    #[test]
    fn test_round_trip_absent_context() {
        let decoded = decode(&encode(&LocaleContext::empty()));
        assert!(decoded.locale().is_none());
        assert!(decoded.time_zone().is_none());
    }

    #[test]
    fn test_decode_without_sentinels() {
        let decoded = decode("pt_BR");
        assert_eq!(decoded.locale().map(ToString::to_string).as_deref(), Some("pt_BR"));
        assert!(decoded.time_zone().is_none());
    }

    #[test]
    fn test_decode_sentinel_inside_value() {
        let decoded = decode("%22en %22America/Sao_Paulo%22");
        assert_eq!(decoded.locale().map(ToString::to_string).as_deref(), Some("en"));
        assert_eq!(decoded.time_zone().map(|z| z.id()), Some("America/Sao_Paulo"));
    }

    #[test]
    fn test_decode_dash_is_absent() {
        assert!(decode("-").is_empty());
        assert!(decode("%22-%22").is_empty());
    }

    #[test]
    fn test_decode_empty_is_absent() {
        assert!(decode("").is_empty());
        assert!(decode("%22%22").is_empty());
    }

    #[test]
    fn test_decode_hyphenated_locale() {
        let decoded = decode("%22pt-BR%22");
        assert_eq!(decoded.locale().map(ToString::to_string).as_deref(), Some("pt_BR"));
    }

    #[test]
    fn test_decode_malformed_locale_degrades() {
        let decoded = decode("???");
        assert!(decoded.locale().is_none());
        assert!(decoded.time_zone().is_none());

        let decoded = decode("%22??? Europe/Paris%22");
        assert!(decoded.locale().is_none());
        assert_eq!(decoded.time_zone().map(|z| z.id()), Some("Europe/Paris"));
    }

    #[test]
    fn test_decode_unknown_zone_falls_back() {
        let decoded = decode("%22en Nowhere/Special%22");
        assert_eq!(decoded.time_zone(), Some(TimeZoneId::FALLBACK));
    }

    #[test]
    fn test_decode_only_first_space_splits() {
        // the zone fragment keeps its trailing text verbatim, which is not a known zone
        let decoded = decode("%22en Europe/Paris extra%22");
        assert_eq!(decoded.locale().map(ToString::to_string).as_deref(), Some("en"));
        assert_eq!(decoded.time_zone(), Some(TimeZoneId::FALLBACK));
    }

    #[test]
    fn test_decode_later_space_does_not_split() {
        // splitting on the last space would give locale "en x" and zone Europe/Paris
        let decoded = decode("%22en x Europe/Paris%22");
        assert_eq!(decoded, ctx(Some("en"), Some("GMT")));

        let decoded = decode("%22pt-BR Europe/Paris Europe/Madrid%22");
        assert_eq!(decoded, ctx(Some("pt_BR"), Some("GMT")));
    }

    #[test]
    fn test_find_cookie_keeps_raw_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("NG_TRANSLATE_LANG_KEY=%22pt_BR%22"));
        assert_eq!(find_cookie(&headers, COOKIE_NAME).as_deref(), Some("%22pt_BR%22"));
        assert_eq!(decode(&find_cookie(&headers, COOKIE_NAME).unwrap()), ctx(Some("pt_BR"), None));
    }

    #[test]
    fn test_find_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("a=1; NG_TRANSLATE_LANG_KEY=%22fr%22"));
        headers.append(COOKIE, HeaderValue::from_static("NG_TRANSLATE_LANG_KEY=%22en%22"));

        assert_eq!(find_cookie(&headers, COOKIE_NAME).as_deref(), Some("%22fr%22"));
        assert_eq!(find_cookie(&headers, "a").as_deref(), Some("1"));
        assert_eq!(find_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_find_cookie_value_with_space() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("NG_TRANSLATE_LANG_KEY=%22en America/Sao_Paulo%22; other=x"),
        );
        assert_eq!(
            find_cookie(&headers, COOKIE_NAME).as_deref(),
            Some("%22en America/Sao_Paulo%22")
        );
    }

    #[test]
    fn test_set_and_expired_cookie() {
        let set = set_cookie(COOKIE_NAME, "%22fr%22").unwrap();
        assert_eq!(set.to_str().unwrap(), "NG_TRANSLATE_LANG_KEY=%22fr%22; Path=/");
        assert!(!set.to_str().unwrap().contains("Max-Age"));

        let expired = expired_cookie(COOKIE_NAME).unwrap();
        let expired = expired.to_str().unwrap();
        assert!(expired.starts_with("NG_TRANSLATE_LANG_KEY=;"));
        assert!(expired.contains("Max-Age=0"));
        assert!(expired.contains("Path=/"));
        assert!(expired.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }
}
