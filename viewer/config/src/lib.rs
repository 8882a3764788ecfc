use std::collections::HashMap;
use std::time::Duration;

use config::{Environment, File, FileFormat};
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Config {
    pub logging: Logging,
    pub application: Application,
    pub portfolio: Portfolio,
    pub form: Form,
}

#[derive(Deserialize)]
pub struct Application {
    pub name: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Portfolio {
    pub url: String,
    /// Request timeout in milliseconds, transport defaults when unset.
    pub timeout: Option<u64>,
}

impl Portfolio {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_millis)
    }
}

#[derive(Deserialize)]
pub struct Form {
    pub start: String,
    pub end: String,
}

#[derive(Deserialize)]
pub struct Logging {
    level: String,
    crates: HashMap<String, String>,
}

impl Logging {
    pub fn levels(&self) -> String {
        let crate_levels = self
            .crates
            .iter()
            .map(|(lib, loglevel)| format!("{lib}={loglevel}"))
            .collect::<Vec<_>>()
            .join(",");
        if crate_levels.is_empty() {
            self.level.clone()
        } else {
            format!("{},{crate_levels}", self.level)
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

impl Config {
    fn load() -> Self {
        Self::builder()
            .build()
            .expect("Error during config creation")
            .try_deserialize()
            .expect("Error during config deserialization")
    }

    fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .add_source(File::from_str(include_str!("../config.yml"), FileFormat::Yaml))
            .add_source(Environment::with_prefix("APP").try_parsing(true).separator("_"))
            .add_source(Environment::with_prefix("VIEWER").try_parsing(true).separator("_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config() {
        let config: Config = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.application.name, "viewer");
        assert_eq!(config.portfolio.url, "http://localhost:8000/api/portfolio/");
        assert_eq!(config.form.start, "2022-02-15");
        assert_eq!(config.form.end, "2022-03-15");
    }

    #[test]
    fn test_logging_levels() {
        let logging = Logging {
            level: "INFO".to_string(),
            crates: HashMap::from([("viewer_core".to_string(), "DEBUG".to_string())]),
        };
        assert_eq!(logging.levels(), "INFO,viewer_core=DEBUG");

        let logging = Logging {
            level: "WARN".to_string(),
            crates: HashMap::new(),
        };
        assert_eq!(logging.levels(), "WARN");
    }
}
