use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;

use crate::records::KindPolicies;
use crate::validation::identifiers::DEFAULT_MAX_ITEMS;
use crate::validation::temporal::{DEFAULT_FUTURE_SKEW_MINUTES, DEFAULT_MAX_AGE_DAYS};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the back-office guard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub validation: ValidationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            validation: ValidationConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Windows and limits applied to incoming writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    pub max_age_days: i64,
    pub future_skew_minutes: i64,
    pub tax_ids_max_items: usize,
}

impl ValidationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_age_days: read_bound("APP_OCCURRED_AT_MAX_AGE_DAYS", DEFAULT_MAX_AGE_DAYS)?,
            future_skew_minutes: read_bound(
                "APP_OCCURRED_AT_FUTURE_SKEW_MINUTES",
                DEFAULT_FUTURE_SKEW_MINUTES,
            )?,
            tax_ids_max_items: read_bound("APP_TAX_IDS_MAX_ITEMS", DEFAULT_MAX_ITEMS as i64)?
                as usize,
        })
    }

    /// Per-kind policy table for these limits.
    pub fn policies(&self) -> KindPolicies {
        KindPolicies::build(
            Duration::days(self.max_age_days),
            Duration::minutes(self.future_skew_minutes),
            self.tax_ids_max_items,
        )
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            future_skew_minutes: DEFAULT_FUTURE_SKEW_MINUTES,
            tax_ids_max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

/// Non-negative integer setting, capped at a century's worth of minutes so
/// duration arithmetic stays in range.
fn read_bound(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    const LIMIT: i64 = 36_500 * 24 * 60;

    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if (0..=LIMIT).contains(&value) => Ok(value),
        _ => Err(ConfigError::InvalidLimit { name, value: raw }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidLimit { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{value}'")
            }
            ConfigError::InvalidLimit { name, value } => {
                write!(f, "{name} must be a non-negative integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidLimit { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordKind;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "APP_OCCURRED_AT_MAX_AGE_DAYS",
            "APP_OCCURRED_AT_FUTURE_SKEW_MINUTES",
            "APP_TAX_IDS_MAX_ITEMS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.validation, ValidationConfig::default());
        assert_eq!(config.validation.policies(), KindPolicies::standard());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn validation_limits_flow_into_policies() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_OCCURRED_AT_MAX_AGE_DAYS", "90");
        env::set_var("APP_OCCURRED_AT_FUTURE_SKEW_MINUTES", "0");
        env::set_var("APP_TAX_IDS_MAX_ITEMS", "8");
        env::set_var("APP_LOG_FORMAT", "json");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.format, LogFormat::Json);

        let policies = config.validation.policies();
        let bill = policies.for_kind(RecordKind::Bill);
        assert_eq!(bill.occurred_at.max_age(), Duration::days(90));
        assert_eq!(bill.occurred_at.future_skew(), Duration::zero());
        assert_eq!(bill.tax_ids.map(|policy| policy.max_items()), Some(8));
        reset_env();
    }

    #[test]
    fn rejects_negative_limits() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_TAX_IDS_MAX_ITEMS", "-1");

        match AppConfig::load() {
            Err(ConfigError::InvalidLimit { name, .. }) => {
                assert_eq!(name, "APP_TAX_IDS_MAX_ITEMS")
            }
            other => panic!("expected invalid limit, got {other:?}"),
        }
        reset_env();
    }
}
