use axum::{Extension, Json, extract::State, http::StatusCode};
use std::sync::Arc;

use crate::AppState;
use crate::middleware::{LocaleUpdate, ResolvedLocale};
use crate::models::{LocaleView, SetLocaleRequest};
use crate::utils::i18n::{LocaleContext, LocaleTag, TimeZoneId};

// Get the locale resolved for this request
#[utoipa::path(
    get,
    path = "/api/locale",
    responses(
        (status = 200, description = "Current locale and time zone", body = LocaleView)
    ),
    tag = "Locale"
)]
pub async fn get_locale(
    State(state): State<Arc<AppState>>,
    Extension(ResolvedLocale(ctx)): Extension<ResolvedLocale>,
) -> Json<LocaleView> {
    Json(LocaleView::new(&ctx, &state.locale_resolver.default_locale()))
}

// Change the locale; persisted through the locale cookie
#[utoipa::path(
    put,
    path = "/api/locale",
    request_body = SetLocaleRequest,
    responses(
        (status = 200, description = "Locale updated", body = LocaleView)
    ),
    tag = "Locale"
)]
pub async fn set_locale(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetLocaleRequest>,
) -> (Extension<LocaleUpdate>, Json<LocaleView>) {
    tracing::debug!("Locale change request: {:?}", req);

    let locale = req.locale.as_deref().and_then(LocaleTag::parse_lenient);
    let time_zone = req.time_zone.as_deref().map(TimeZoneId::parse_lenient);
    let ctx = LocaleContext::new(locale, time_zone);

    let view = LocaleView::new(&ctx, &state.locale_resolver.default_locale());
    (Extension(LocaleUpdate::Set(ctx)), Json(view))
}

// Forget the stored locale
#[utoipa::path(
    delete,
    path = "/api/locale",
    responses(
        (status = 204, description = "Locale cookie cleared")
    ),
    tag = "Locale"
)]
pub async fn clear_locale() -> (StatusCode, Extension<LocaleUpdate>) {
    tracing::debug!("Locale clear request");
    (StatusCode::NO_CONTENT, Extension(LocaleUpdate::Clear))
}
