pub mod error;
pub mod i18n;
pub mod locale_cookie;

pub use error::{AlertKey, ApiError, ApiResult};
pub use i18n::{
    DefaultLocaleProvider, FixedLocaleProvider, LocaleContext, LocaleTag, TimeZoneId, get_locale,
};
