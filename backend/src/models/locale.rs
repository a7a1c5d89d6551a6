use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::i18n::{LocaleContext, LocaleTag};

/// Locale settings of the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocaleView {
    pub locale: String,
    pub time_zone: Option<String>,
    /// Current time in `time_zone`, RFC 3339
    pub local_time: Option<String>,
}

impl LocaleView {
    /// Build the view, filling an absent locale with `default_locale`
    pub fn new(ctx: &LocaleContext, default_locale: &LocaleTag) -> Self {
        let locale = ctx.locale().unwrap_or(default_locale).to_string();
        let time_zone = ctx.time_zone();
        Self {
            locale,
            time_zone: time_zone.map(|zone| zone.id().to_string()),
            local_time: time_zone.map(|zone| zone.now().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SetLocaleRequest {
    /// Language tag such as "pt-BR" or "en"
    pub locale: Option<String>,
    /// IANA time zone such as "America/Sao_Paulo"
    pub time_zone: Option<String>,
}
