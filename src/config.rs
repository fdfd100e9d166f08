use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::api::dates;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub public_url: Option<String>,
    pub timezone: Option<String>,
    pub display_locale: Option<String>,
    pub max_body_bytes: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let mut config: Config = cfg.try_deserialize()?;

        // Valores por defecto cuando el entorno no los fija
        if config.timezone.is_none() {
            config.timezone = Some("UTC".to_string());
        }
        if config.display_locale.is_none() {
            config.display_locale = Some(dates::DEFAULT_LOCALE.to_string());
        }

        config.validate()?;

        Ok(config)
    }

    /// Obtiene la zona horaria configurada del servidor.
    pub fn get_timezone(&self) -> Result<Tz, chrono_tz::ParseError> {
        let tz_str = self.timezone.as_deref().unwrap_or("UTC");
        tz_str.parse::<Tz>()
    }

    /// Locale de presentación para fechas legibles.
    pub fn display_locale(&self) -> &str {
        self.display_locale
            .as_deref()
            .unwrap_or(dates::DEFAULT_LOCALE)
    }

    /// Valida la configuración antes de arrancar el servidor.
    fn validate(&self) -> Result<(), config::ConfigError> {
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher for security reasons".to_string(),
            ));
        }

        if let Some(tz_str) = &self.timezone {
            if tz_str.parse::<Tz>().is_err() {
                return Err(config::ConfigError::Message(format!(
                    "Invalid timezone: {}",
                    tz_str
                )));
            }
        }

        // El locale se resuelve con fallback en tiempo de ejecución; aquí solo
        // se rechaza el identificador vacío, que siempre es un error de entorno
        if let Some(locale) = &self.display_locale {
            if locale.trim().is_empty() {
                return Err(config::ConfigError::Message(
                    "display_locale must not be empty".to_string(),
                ));
            }
        }

        // Límite de cuerpo (si se indica): 1MB..500MB
        if let Some(limit) = self.max_body_bytes {
            let min = 1024 * 1024; // 1MB
            let max = 500 * 1024 * 1024; // 500MB
            if limit < min || limit > max {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    min, max
                )));
            }
        }

        Ok(())
    }

    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(10 * 1024 * 1024)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_url: None,
            timezone: Some("Europe/Madrid".to_string()),
            display_locale: Some("es-ES".to_string()),
            max_body_bytes: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn privileged_ports_are_rejected() {
        let mut config = base_config();
        config.port = 80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let mut config = base_config();
        config.timezone = Some("Madrid/Europa".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn body_limit_bounds_are_enforced() {
        let mut config = base_config();
        config.max_body_bytes = Some(10);
        assert!(config.validate().is_err());

        config.max_body_bytes = Some(2 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn display_locale_defaults_to_spanish() {
        let mut config = base_config();
        config.display_locale = None;
        assert_eq!(config.display_locale(), "es-ES");
    }
}
