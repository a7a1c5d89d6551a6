//! Internationalization utilities for the backend
//!
//! This module provides the locale and time zone value types used by the
//! locale cookie, plus task-local storage for the locale that error
//! messages are rendered in.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

tokio::task_local! {
    static CURRENT_LOCALE: &'static str;
}

/// Locales with a message catalogue under `locales/`
pub const SUPPORTED_LOCALES: &[&str] = &["en", "pt-BR"];
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocaleParseError {
    #[error("empty locale specification")]
    Empty,

    #[error("invalid locale specification '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// Normalized language-region identifier, rendered as `pt_BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleTag(LanguageIdentifier);

impl LocaleTag {
    /// Parse a tag separated by hyphens or underscores (`pt-BR`, `pt_BR`).
    pub fn parse(input: &str) -> Result<Self, LocaleParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LocaleParseError::Empty);
        }

        let normalized = trimmed.replace('_', "-");
        normalized
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|err| LocaleParseError::Invalid {
                input: input.to_string(),
                reason: err.to_string(),
            })
    }

    /// Parse a tag, degrading to `None` instead of failing.
    pub fn parse_lenient(input: &str) -> Option<Self> {
        match Self::parse(input) {
            Ok(tag) => Some(tag),
            Err(err) => {
                tracing::warn!("Ignoring locale '{}': {}", input, err);
                None
            },
        }
    }

    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(|region| region.as_str())
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.language.as_str())?;
        if let Some(script) = &self.0.script {
            write!(f, "_{}", script.as_str())?;
        }
        if let Some(region) = &self.0.region {
            write!(f, "_{}", region.as_str())?;
        }
        for variant in self.0.variants() {
            write!(f, "_{}", variant.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for LocaleTag {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// IANA time zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeZoneId(Tz);

impl TimeZoneId {
    /// Zone substituted for identifiers that are not in the IANA database
    pub const FALLBACK: TimeZoneId = TimeZoneId(Tz::GMT);

    /// Strict lookup: `None` when the id is unknown.
    pub fn parse(id: &str) -> Option<Self> {
        id.parse::<Tz>().ok().map(Self)
    }

    /// Lookup that never fails; unknown ids map to [`TimeZoneId::FALLBACK`].
    pub fn parse_lenient(id: &str) -> Self {
        Self::parse(id).unwrap_or_else(|| {
            tracing::debug!(
                "Unknown time zone '{}', falling back to {}",
                id,
                Self::FALLBACK.id()
            );
            Self::FALLBACK
        })
    }

    pub fn id(&self) -> &'static str {
        self.0.name()
    }

    /// Current wall-clock time in this zone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.0)
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Locale and time zone resolved for one request. Either part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleContext {
    locale: Option<LocaleTag>,
    time_zone: Option<TimeZoneId>,
}

impl LocaleContext {
    pub fn new(locale: Option<LocaleTag>, time_zone: Option<TimeZoneId>) -> Self {
        Self { locale, time_zone }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn locale(&self) -> Option<&LocaleTag> {
        self.locale.as_ref()
    }

    pub fn time_zone(&self) -> Option<TimeZoneId> {
        self.time_zone
    }

    pub fn is_empty(&self) -> bool {
        self.locale.is_none() && self.time_zone.is_none()
    }
}

/// Source of the locale used when a request carries none.
pub trait DefaultLocaleProvider: Send + Sync {
    fn default_locale(&self) -> LocaleTag;
}

/// Default locale fixed at startup from configuration
#[derive(Debug, Clone)]
pub struct FixedLocaleProvider {
    locale: LocaleTag,
}

impl FixedLocaleProvider {
    pub fn new(locale: LocaleTag) -> Self {
        Self { locale }
    }
}

impl DefaultLocaleProvider for FixedLocaleProvider {
    fn default_locale(&self) -> LocaleTag {
        self.locale.clone()
    }
}

/// Map a resolved locale onto one of the message catalogues
pub fn message_locale_for(locale: &LocaleTag) -> &'static str {
    match locale.language() {
        "pt" => "pt-BR",
        "en" => "en",
        _ => DEFAULT_LOCALE,
    }
}

/// Get the message locale of the current request
pub fn get_locale() -> String {
    CURRENT_LOCALE
        .try_with(|locale| locale.to_string())
        .unwrap_or_else(|_| DEFAULT_LOCALE.to_string())
}

/// Run `fut` with `locale` as the message locale
pub async fn with_locale<F>(locale: &'static str, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_LOCALE.scope(locale, fut).await
}
