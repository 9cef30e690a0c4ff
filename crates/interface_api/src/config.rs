//! API configuration

use rust_decimal::Decimal;
use serde::Deserialize;

fn default_tariff_rate() -> Decimal {
    Decimal::new(15, 2)
}

fn default_tariff_currency() -> String {
    "USD".to_string()
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Flat tariff price per kWh
    #[serde(default = "default_tariff_rate")]
    pub tariff_rate: Decimal,
    /// ISO currency code the tariff prices in
    #[serde(default = "default_tariff_currency")]
    pub tariff_currency: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/metering".to_string(),
            log_level: "info".to_string(),
            tariff_rate: default_tariff_rate(),
            tariff_currency: default_tariff_currency(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment variables with the `API_` prefix
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.tariff_rate, dec!(0.15));
        assert_eq!(config.tariff_currency, "USD");
    }
}
