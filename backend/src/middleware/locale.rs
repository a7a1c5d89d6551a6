//! Locale resolution middleware
//!
//! Resolves the locale and time zone of each request from the
//! `NG_TRANSLATE_LANG_KEY` cookie, lets a `?language=` query parameter
//! override it, and writes the decision back as a cookie whenever it is set
//! explicitly.

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, Uri, header::SET_COOKIE},
    middleware::Next,
    response::Response,
};

use crate::config::LocaleConfig;
use crate::utils::i18n::{
    DefaultLocaleProvider, LocaleContext, LocaleTag, TimeZoneId, message_locale_for, with_locale,
};
use crate::utils::locale_cookie::{self, COOKIE_NAME, LANGUAGE_PARAM};

/// Locale attributes scoped to a single request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleAttributes {
    pub locale: Option<LocaleTag>,
    pub time_zone: Option<TimeZoneId>,
}

/// Locale context resolved for the current request, available to handlers
/// as `Extension<ResolvedLocale>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale(pub LocaleContext);

/// Explicit locale change requested by a handler through its response
/// extensions. `Clear` drops the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleUpdate {
    Set(LocaleContext),
    Clear,
}

impl LocaleUpdate {
    pub fn context(&self) -> Option<&LocaleContext> {
        match self {
            Self::Set(ctx) => Some(ctx),
            Self::Clear => None,
        }
    }
}

pub struct CookieLocaleResolver {
    cookie_name: String,
    query_param: String,
    defaults: Arc<dyn DefaultLocaleProvider>,
}

impl CookieLocaleResolver {
    pub fn new(defaults: Arc<dyn DefaultLocaleProvider>) -> Self {
        Self {
            cookie_name: COOKIE_NAME.to_string(),
            query_param: LANGUAGE_PARAM.to_string(),
            defaults,
        }
    }

    pub fn from_config(config: &LocaleConfig, defaults: Arc<dyn DefaultLocaleProvider>) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            query_param: config.query_param.clone(),
            defaults,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn default_locale(&self) -> LocaleTag {
        self.defaults.default_locale()
    }

    /// Locale of the request, or the default when nothing was resolved
    pub fn current_locale(&self, attrs: &LocaleAttributes) -> LocaleTag {
        attrs.locale.clone().unwrap_or_else(|| self.default_locale())
    }

    /// Resolve the request's locale context, reading the cookie only when
    /// no locale has been resolved yet.
    pub fn resolve_locale_context(
        &self,
        attrs: &mut LocaleAttributes,
        request_headers: &HeaderMap,
    ) -> LocaleContext {
        self.parse_locale_cookie_if_necessary(attrs, request_headers);
        LocaleContext::new(attrs.locale.clone(), attrs.time_zone)
    }

    /// Set (`Some`) or clear (`None`) the locale context and emit the
    /// matching `Set-Cookie` header into `response_headers`.
    pub fn set_locale_context(
        &self,
        attrs: &mut LocaleAttributes,
        response_headers: &mut HeaderMap,
        ctx: Option<&LocaleContext>,
    ) {
        let (locale, time_zone) = match ctx {
            Some(ctx) => {
                self.add_cookie(response_headers, &locale_cookie::encode(ctx));
                (ctx.locale().cloned(), ctx.time_zone())
            },
            None => {
                self.remove_cookie(response_headers);
                (None, None)
            },
        };

        attrs.locale = Some(locale.unwrap_or_else(|| self.default_locale()));
        attrs.time_zone = time_zone;
    }

    /// Locale override carried by the query string, if any. Only the first
    /// occurrence of the parameter counts; a value that does not parse
    /// overrides with an absent locale.
    pub fn locale_override(&self, uri: &Uri) -> Option<LocaleContext> {
        let Query(params) = match Query::<Vec<(String, String)>>::try_from_uri(uri) {
            Ok(params) => params,
            Err(err) => {
                tracing::debug!("Ignoring unreadable query string: {}", err);
                return None;
            },
        };

        let (_, value) = params.into_iter().find(|(key, _)| *key == self.query_param)?;
        let locale = LocaleTag::parse_lenient(&value);
        Some(LocaleContext::new(locale, None))
    }

    fn add_cookie(&self, response_headers: &mut HeaderMap, cookie_value: &str) {
        match locale_cookie::set_cookie(&self.cookie_name, cookie_value) {
            Ok(header) => {
                response_headers.append(SET_COOKIE, header);
                tracing::debug!(
                    "Added cookie with name [{}] and value [{}]",
                    self.cookie_name,
                    cookie_value
                );
            },
            Err(err) => {
                tracing::warn!("Cannot write cookie value [{}]: {}", cookie_value, err);
            },
        }
    }

    fn remove_cookie(&self, response_headers: &mut HeaderMap) {
        match locale_cookie::expired_cookie(&self.cookie_name) {
            Ok(header) => {
                response_headers.append(SET_COOKIE, header);
                tracing::debug!("Removed cookie with name [{}]", self.cookie_name);
            },
            Err(err) => {
                tracing::warn!("Cannot expire cookie [{}]: {}", self.cookie_name, err);
            },
        }
    }

    fn parse_locale_cookie_if_necessary(
        &self,
        attrs: &mut LocaleAttributes,
        request_headers: &HeaderMap,
    ) {
        if attrs.locale.is_some() {
            return;
        }

        let Some(value) = locale_cookie::find_cookie(request_headers, &self.cookie_name) else {
            return;
        };

        let ctx = locale_cookie::decode(&value);
        tracing::trace!(
            "Parsed cookie value [{}] into locale '{}'{}",
            value,
            ctx.locale().map(ToString::to_string).unwrap_or_default(),
            ctx.time_zone()
                .map(|zone| format!(" and time zone '{}'", zone.id()))
                .unwrap_or_default()
        );

        attrs.locale = Some(ctx.locale().cloned().unwrap_or_else(|| self.default_locale()));
        attrs.time_zone = ctx.time_zone();
    }
}

/// Middleware resolving the locale of every request.
///
/// Order: query override, cookie, handler, explicit update from the
/// handler's response. Pending cookies are appended to the response last.
pub async fn locale_middleware(
    State(resolver): State<Arc<CookieLocaleResolver>>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut attrs = LocaleAttributes::default();
    let mut pending = HeaderMap::new();

    if let Some(ctx) = resolver.locale_override(req.uri()) {
        tracing::debug!(
            "Locale override from query: {}",
            ctx.locale().map(ToString::to_string).unwrap_or_else(|| "-".to_string())
        );
        resolver.set_locale_context(&mut attrs, &mut pending, Some(&ctx));
    }

    let ctx = resolver.resolve_locale_context(&mut attrs, req.headers());
    let message_locale = message_locale_for(&resolver.current_locale(&attrs));
    req.extensions_mut().insert(ResolvedLocale(ctx));

    let mut response = with_locale(message_locale, next.run(req)).await;

    if let Some(update) = response.extensions_mut().remove::<LocaleUpdate>() {
        resolver.set_locale_context(&mut attrs, &mut pending, update.context());
    }

    for header in pending.get_all(SET_COOKIE) {
        response.headers_mut().append(SET_COOKIE, header.clone());
    }

    response
}
