use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::utils::i18n::LocaleTag;
use crate::utils::locale_cookie::{COOKIE_NAME, LANGUAGE_PARAM};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub static_config: StaticConfig,
    pub locale: LocaleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Pool acquire timeout in seconds (accepts "3s", "1m")
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub enabled: bool,
    pub web_root: String,
}

/// Locale cookie and query override settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub cookie_name: String,
    pub query_param: String,
    /// Locale used when a request carries none (e.g. "pt_BR")
    pub default_locale: String,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from `path`, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
        let config_path = match path {
            Some(path) => Some(path.to_string()),
            None => Self::find_config_file(),
        };

        let mut config = if let Some(config_path) = config_path {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_DATABASE_URL: Database URL (default: sqlite://data/metas-enem.db)
    /// - APP_DATABASE_ACQUIRE_TIMEOUT: Pool acquire timeout (accepts "3s", "1m")
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,metas_enem=debug")
    /// - APP_LOCALE_DEFAULT: Default locale (e.g., "pt_BR")
    /// - APP_LOCALE_COOKIE_NAME: Name of the locale cookie
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(db_url) = std::env::var("APP_DATABASE_URL") {
            self.database.url = db_url;
            tracing::info!("Override database.url from env");
        }

        if let Ok(timeout) = std::env::var("APP_DATABASE_ACQUIRE_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.database.acquire_timeout_secs = val;
                    tracing::info!(
                        "Override database.acquire_timeout_secs from env: {}",
                        self.database.acquire_timeout_secs
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_DATABASE_ACQUIRE_TIMEOUT '{}': {} (keep {})",
                    timeout,
                    e,
                    self.database.acquire_timeout_secs
                ),
            }
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(locale) = std::env::var("APP_LOCALE_DEFAULT") {
            self.locale.default_locale = locale;
            tracing::info!("Override locale.default_locale from env: {}", self.locale.default_locale);
        }

        if let Ok(name) = std::env::var("APP_LOCALE_COOKIE_NAME") {
            self.locale.cookie_name = name;
            tracing::info!("Override locale.cookie_name from env: {}", self.locale.cookie_name);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be > 0");
        }
        if self.database.acquire_timeout_secs == 0 {
            anyhow::bail!("database.acquire_timeout_secs must be > 0");
        }

        if self.locale.cookie_name.is_empty()
            || !self
                .locale
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            anyhow::bail!("Invalid locale.cookie_name '{}'", self.locale.cookie_name);
        }
        if self.locale.query_param.is_empty() {
            anyhow::bail!("locale.query_param cannot be empty");
        }
        if let Err(e) = self.locale.default_tag() {
            anyhow::bail!("Invalid locale.default_locale: {}", e);
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl LocaleConfig {
    pub fn default_tag(&self) -> Result<LocaleTag, crate::utils::i18n::LocaleParseError> {
        LocaleTag::parse(&self.default_locale)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/metas-enem.db".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,metas_enem=debug".to_string(),
            file: Some("logs/metas-enem.log".to_string()),
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self { enabled: false, web_root: "web".to_string() }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            cookie_name: COOKIE_NAME.to_string(),
            query_param: LANGUAGE_PARAM.to_string(),
            default_locale: "en".to_string(),
        }
    }
}

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(n * 60),
        "h" | "hr" | "hour" | "hours" => Ok(n * 60 * 60),
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Accepts either a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '3s', '1m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.locale.cookie_name, "NG_TRANSLATE_LANG_KEY");
        assert_eq!(config.locale.query_param, "language");
    }

    #[test]
    fn test_parse_toml_sections() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9090

            [database]
            url = "sqlite::memory:"
            acquire_timeout_secs = "1m"

            [locale]
            default_locale = "pt-BR"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.acquire_timeout_secs, 60);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.locale.default_tag().unwrap().to_string(), "pt_BR");
        assert_eq!(config.locale.cookie_name, COOKIE_NAME);
    }

    #[test]
    fn test_validate_rejects_bad_locale_settings() {
        let mut config = Config::default();
        config.locale.default_locale = "???".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.locale.cookie_name = "bad name;".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_duration_to_secs() {
        assert_eq!(parse_duration_to_secs("5"), Ok(5));
        assert_eq!(parse_duration_to_secs("3s"), Ok(3));
        assert_eq!(parse_duration_to_secs("2m"), Ok(120));
        assert_eq!(parse_duration_to_secs("1h"), Ok(3600));
        assert!(parse_duration_to_secs("10x").is_err());
        assert!(parse_duration_to_secs("s").is_err());
    }
}
