use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub upstream: UpstreamSettings,
    pub locations: LocationSettings,
    pub audit: AuditSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    /// Empty string means direct connection; otherwise a forward-proxy URL
    /// or `socks5://[user:pass@]host:port`.
    pub proxy_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationSettings {
    pub path: String,
    pub ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditSettings {
    pub directory: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 5050)?
            .set_default("upstream.proxy_addr", "")?
            .set_default("locations.path", "source/locations.json")?
            .set_default("locations.ttl_secs", 3)?
            .set_default("audit.directory", "/tmp/data")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("TILEGATE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_can_be_loaded() {
        let settings = Settings::new();
        assert!(settings.is_ok());
    }

    #[test]
    fn test_defaults_select_direct_connection() {
        let settings = Settings::new().unwrap();
        assert!(settings.upstream.proxy_addr.is_empty());
        assert_eq!(settings.locations.ttl_secs, 3);
    }
}
