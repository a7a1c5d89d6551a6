//! metas-enem backend
//!
//! REST API over students (`Aluno`) and their ENEM score goals (`Meta`),
//! with per-request locale resolution from the front end's language cookie.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{Router, routing::get};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{LocaleConfig, StaticConfig};
use crate::middleware::{CookieLocaleResolver, locale_middleware};
use crate::services::{AlunoService, MetaService};
use crate::utils::i18n::FixedLocaleProvider;

rust_i18n::i18n!("locales", fallback = "en");

pub struct AppState {
    pub db: SqlitePool,
    pub aluno_service: Arc<AlunoService>,
    pub meta_service: Arc<MetaService>,
    pub locale_resolver: Arc<CookieLocaleResolver>,
}

impl AppState {
    pub fn new(db: SqlitePool, locale: &LocaleConfig) -> Result<Self, anyhow::Error> {
        let default_locale = locale.default_tag()?;
        let defaults = Arc::new(FixedLocaleProvider::new(default_locale));

        Ok(Self {
            aluno_service: Arc::new(AlunoService::new(db.clone())),
            meta_service: Arc::new(MetaService::new(db.clone())),
            locale_resolver: Arc::new(CookieLocaleResolver::from_config(locale, defaults)),
            db,
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::aluno::list_alunos,
        handlers::aluno::get_aluno,
        handlers::aluno::create_aluno,
        handlers::aluno::update_aluno,
        handlers::aluno::partial_update_aluno,
        handlers::aluno::delete_aluno,
        handlers::meta::list_metas,
        handlers::meta::get_meta,
        handlers::meta::create_meta,
        handlers::meta::update_meta,
        handlers::meta::partial_update_meta,
        handlers::meta::delete_meta,
        handlers::locale::get_locale,
        handlers::locale::set_locale,
        handlers::locale::clear_locale,
    ),
    components(schemas(
        models::AlunoDto,
        models::AlunoPatch,
        models::AlunoRef,
        models::MetaDto,
        models::MetaPatch,
        models::Area,
        models::LocaleView,
        models::SetLocaleRequest,
    )),
    tags(
        (name = "Alunos", description = "Students"),
        (name = "Metas", description = "Score goals per ENEM area"),
        (name = "Locale", description = "Language and time zone of the caller"),
    )
)]
pub struct ApiDoc;

/// Build the application router.
///
/// The locale middleware wraps every route, so handlers and error
/// responses see the resolved locale.
pub fn build_router(state: Arc<AppState>, static_config: &StaticConfig) -> Router {
    let api = Router::new()
        .route(
            "/api/alunos",
            get(handlers::aluno::list_alunos).post(handlers::aluno::create_aluno),
        )
        .route(
            "/api/alunos/:id",
            get(handlers::aluno::get_aluno)
                .put(handlers::aluno::update_aluno)
                .patch(handlers::aluno::partial_update_aluno)
                .delete(handlers::aluno::delete_aluno),
        )
        .route(
            "/api/metas",
            get(handlers::meta::list_metas).post(handlers::meta::create_meta),
        )
        .route(
            "/api/metas/:id",
            get(handlers::meta::get_meta)
                .put(handlers::meta::update_meta)
                .patch(handlers::meta::partial_update_meta)
                .delete(handlers::meta::delete_meta),
        )
        .route(
            "/api/locale",
            get(handlers::locale::get_locale)
                .put(handlers::locale::set_locale)
                .delete(handlers::locale::clear_locale),
        )
        .with_state(Arc::clone(&state));

    let mut app = Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api);

    if static_config.enabled {
        tracing::info!("Serving static files from {}", static_config.web_root);
        app = app.fallback_service(ServeDir::new(&static_config.web_root));
    }

    app.layer(axum::middleware::from_fn_with_state(
        Arc::clone(&state.locale_resolver),
        locale_middleware,
    ))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}
