use crate::domain::Decimal;
use crate::engine::ClosedPositionPolicy;
use crate::pricing::MarkupPriceSource;
use std::collections::HashMap;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub mock_price_markup: Decimal,
    pub closed_positions: ClosedPositionPolicy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            mock_price_markup: MarkupPriceSource::default().markup(),
            closed_positions: ClosedPositionPolicy::Retain,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_addr = match env_map.get("BIND_ADDR") {
            Some(s) => s.trim().parse::<IpAddr>().map_err(|_| {
                ConfigError::InvalidValue(
                    "BIND_ADDR".to_string(),
                    "must be an IP address".to_string(),
                )
            })?,
            None => defaults.bind_addr,
        };

        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let mock_price_markup = match env_map.get("MOCK_PRICE_MARKUP") {
            Some(s) => {
                let markup = Decimal::from_str_canonical(s).map_err(|_| {
                    ConfigError::InvalidValue(
                        "MOCK_PRICE_MARKUP".to_string(),
                        "must be a decimal number".to_string(),
                    )
                })?;
                if markup.is_negative() {
                    return Err(ConfigError::InvalidValue(
                        "MOCK_PRICE_MARKUP".to_string(),
                        "must not be negative".to_string(),
                    ));
                }
                markup
            }
            None => defaults.mock_price_markup,
        };

        let closed_positions = env_map
            .get("CLOSED_POSITIONS")
            .map(|s| s.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "retain".to_string())
            .parse::<ClosedPositionPolicy>()
            .map_err(|msg| ConfigError::InvalidValue("CLOSED_POSITIONS".to_string(), msg))?;

        Ok(Config {
            bind_addr,
            port,
            mock_price_markup,
            closed_positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(
            config.mock_price_markup,
            Decimal::from_str_canonical("1.1").unwrap()
        );
        assert_eq!(config.closed_positions, ClosedPositionPolicy::Retain);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_env_map(env(&[
            ("PORT", "9000"),
            ("BIND_ADDR", "0.0.0.0"),
            ("MOCK_PRICE_MARKUP", "1.25"),
            ("CLOSED_POSITIONS", "Drop"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_addr, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(
            config.mock_price_markup,
            Decimal::from_str_canonical("1.25").unwrap()
        );
        assert_eq!(config.closed_positions, ClosedPositionPolicy::Drop);
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_env_map(env(&[("PORT", "not_a_number")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_bind_addr() {
        let result = Config::from_env_map(env(&[("BIND_ADDR", "localhost:80")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "BIND_ADDR"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_negative_markup_rejected() {
        let result = Config::from_env_map(env(&[("MOCK_PRICE_MARKUP", "-1")]));
        match result {
            Err(ConfigError::InvalidValue(k, msg)) => {
                assert_eq!(k, "MOCK_PRICE_MARKUP");
                assert!(msg.contains("negative"));
            }
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_closed_positions_policy() {
        let result = Config::from_env_map(env(&[("CLOSED_POSITIONS", "hide")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "CLOSED_POSITIONS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
