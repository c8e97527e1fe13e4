use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use backoffice_core::{LanguageId, ShopId};

use crate::app::flash::MAX_PENDING_SESSIONS;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Directory virtual product files are served from.
    pub download_dir: PathBuf,
    pub default_shop: ShopId,
    pub default_language: LanguageId,
    pub multishop_active: bool,
    /// Prefix of product image URLs returned by association search.
    pub image_base_url: String,
    /// Sessions that may hold undelivered flash messages at once.
    pub flash_max_sessions: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default        |
    /// |----------------------------|----------------|
    /// | `HOST`                     | `0.0.0.0`      |
    /// | `PORT`                     | `8080`         |
    /// | `JWT_SECRET`               | `dev-secret`   |
    /// | `DOWNLOAD_DIR`             | `./download`   |
    /// | `SHOP_DEFAULT`             | `1`            |
    /// | `LANG_DEFAULT`             | `1`            |
    /// | `MULTISHOP_FEATURE_ACTIVE` | `false`        |
    /// | `IMG_BASE_URL`             | `/img`         |
    /// | `FLASH_MAX_SESSIONS`       | `10000`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse(&lookup, "PORT", "8080")?,
            jwt_secret,
            download_dir: lookup("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./download")),
            default_shop: parse(&lookup, "SHOP_DEFAULT", "1")?,
            default_language: parse(&lookup, "LANG_DEFAULT", "1")?,
            multishop_active: lookup("MULTISHOP_FEATURE_ACTIVE")
                .map(|v| parse_flag("MULTISHOP_FEATURE_ACTIVE", &v))
                .transpose()?
                .unwrap_or(false),
            image_base_url: lookup("IMG_BASE_URL").unwrap_or_else(|| "/img".into()),
            flash_max_sessions: parse(
                &lookup,
                "FLASH_MAX_SESSIONS",
                &MAX_PENDING_SESSIONS.to_string(),
            )?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse().map_err(|_| invalid(key, &raw))
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, raw)),
    }
}
