use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub latency: LatencyConfig,
    pub scheduling: SchedulingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

/// Simulated network latency applied to the mutating calls. The real backend
/// replaces these with actual round trips; tests set them to zero.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatencyConfig {
    pub auth: Duration,
    pub sign_out: Duration,
    pub booking: Duration,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SchedulingConfig {
    pub day_start_hour: u8,
    pub day_end_hour: u8,
    pub slot_minutes: u16,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let auth_ms = match env::var("AUTH_LATENCY_MS") {
            Ok(val) => val.parse().context("Failed to parse AUTH_LATENCY_MS")?,
            Err(_) => 1000, // Default value
        };
        let sign_out_ms = match env::var("SIGN_OUT_LATENCY_MS") {
            Ok(val) => val.parse().context("Failed to parse SIGN_OUT_LATENCY_MS")?,
            Err(_) => 500,
        };
        let booking_ms = match env::var("BOOKING_LATENCY_MS") {
            Ok(val) => val.parse().context("Failed to parse BOOKING_LATENCY_MS")?,
            Err(_) => 1000,
        };

        let day_start_hour = match env::var("WORKING_DAY_START_HOUR") {
            Ok(val) => val.parse().context("Failed to parse WORKING_DAY_START_HOUR")?,
            Err(_) => 9,
        };
        let day_end_hour = match env::var("WORKING_DAY_END_HOUR") {
            Ok(val) => val.parse().context("Failed to parse WORKING_DAY_END_HOUR")?,
            Err(_) => 17,
        };
        let slot_minutes = match env::var("SLOT_GRANULARITY_MINUTES") {
            Ok(val) => val.parse().context("Failed to parse SLOT_GRANULARITY_MINUTES")?,
            Err(_) => 30,
        };

        if day_start_hour >= day_end_hour || day_end_hour > 23 {
            bail!(
                "Working day hours out of range: start {} end {}",
                day_start_hour,
                day_end_hour
            );
        }
        if slot_minutes == 0 {
            bail!("SLOT_GRANULARITY_MINUTES must be positive");
        }

        let environment_str =
            env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = match environment_str.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "SchemaX Core".to_string());

        Ok(Config {
            app: AppConfig {
                name: app_name,
                environment,
            },
            latency: LatencyConfig {
                auth: Duration::from_millis(auth_ms),
                sign_out: Duration::from_millis(sign_out_ms),
                booking: Duration::from_millis(booking_ms),
            },
            scheduling: SchedulingConfig {
                day_start_hour,
                day_end_hour,
                slot_minutes,
            },
        })
    }

    /// Configuration with all simulated latency removed.
    pub fn instant() -> Self {
        let mut config = Config::default();
        config.latency = LatencyConfig {
            auth: Duration::ZERO,
            sign_out: Duration::ZERO,
            booking: Duration::ZERO,
        };
        config
    }

    #[allow(unused)]
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }

    #[allow(unused)]
    pub fn is_development(&self) -> bool {
        self.app.environment == Environment::Development
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                name: "SchemaX Core".to_string(),
                environment: Environment::Development,
            },
            latency: LatencyConfig {
                auth: Duration::from_millis(1000),
                sign_out: Duration::from_millis(500),
                booking: Duration::from_millis(1000),
            },
            scheduling: SchedulingConfig {
                day_start_hour: 9,
                day_end_hour: 17,
                slot_minutes: 30,
            },
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_showcase_delays() {
        let config = Config::default();
        assert_eq!(config.latency.auth, Duration::from_millis(1000));
        assert_eq!(config.latency.sign_out, Duration::from_millis(500));
        assert_eq!(config.scheduling.day_start_hour, 9);
        assert_eq!(config.scheduling.day_end_hour, 17);
        assert_eq!(config.scheduling.slot_minutes, 30);
    }

    #[test]
    fn instant_zeroes_every_latency() {
        let config = Config::instant();
        assert_eq!(config.latency.auth, Duration::ZERO);
        assert_eq!(config.latency.sign_out, Duration::ZERO);
        assert_eq!(config.latency.booking, Duration::ZERO);
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(
            "PRODUCTION".parse::<Environment>(),
            Ok(Environment::Production)
        );
        assert!("eu-west".parse::<Environment>().is_err());
    }
}
