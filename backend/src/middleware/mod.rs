pub mod locale;

pub use locale::{
    CookieLocaleResolver, LocaleAttributes, LocaleUpdate, ResolvedLocale, locale_middleware,
};
