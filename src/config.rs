use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::{MatchConfig, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub rest: RestSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which store the venue catalog is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    Postgres,
    Rest,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_backend")]
    pub backend: CatalogBackend,
    #[serde(default = "default_table")]
    pub table: String,
    /// JSON seed file for the memory backend
    pub seed_path: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            table: default_table(),
            seed_path: None,
        }
    }
}

fn default_backend() -> CatalogBackend { CatalogBackend::Postgres }
fn default_table() -> String { "locations".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestSettings {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: None,
            ttl_secs: None,
            l1_cache_size: None,
        }
    }
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: u32,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            relevance_threshold: default_relevance_threshold(),
            max_results: default_max_results(),
        }
    }
}

fn default_relevance_threshold() -> u32 { 30 }
fn default_max_results() -> usize { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_price_fit_weight")]
    pub price_fit: f64,
    #[serde(default = "default_capacity_fit_weight")]
    pub capacity_fit: f64,
    #[serde(default = "default_budget_fit_weight")]
    pub budget_fit: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            price_fit: default_price_fit_weight(),
            capacity_fit: default_capacity_fit_weight(),
            budget_fit: default_budget_fit_weight(),
        }
    }
}

fn default_price_fit_weight() -> f64 { 40.0 }
fn default_capacity_fit_weight() -> f64 { 30.0 }
fn default_budget_fit_weight() -> f64 { 30.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VENUE)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VENUE__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Engine parameters derived from the scoring and matching sections
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            weights: ScoringWeights {
                price_fit: self.scoring.weights.price_fit,
                capacity_fit: self.scoring.weights.capacity_fit,
                budget_fit: self.scoring.weights.budget_fit,
            },
            relevance_threshold: self.matching.relevance_threshold,
            max_results: self.matching.max_results,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("VENUE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The conventional DATABASE_URL wins over configured values
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.price_fit, 40.0);
        assert_eq!(weights.capacity_fit, 30.0);
        assert_eq!(weights.budget_fit, 30.0);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let settings = from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            "#,
        );

        assert_eq!(settings.catalog.backend, CatalogBackend::Postgres);
        assert_eq!(settings.catalog.table, "locations");
        assert!(settings.cache.enabled);
        assert_eq!(settings.match_config(), MatchConfig::default());
    }

    #[test]
    fn test_overrides() {
        let settings = from_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            workers = 2

            [catalog]
            backend = "memory"
            seed_path = "data/venues.json"

            [matching]
            relevance_threshold = 50
            max_results = 10

            [scoring.weights]
            price_fit = 50.0
            capacity_fit = 25.0
            budget_fit = 25.0
            "#,
        );

        assert_eq!(settings.catalog.backend, CatalogBackend::Memory);
        assert_eq!(settings.catalog.seed_path.as_deref(), Some("data/venues.json"));

        let config = settings.match_config();
        assert_eq!(config.relevance_threshold, 50);
        assert_eq!(config.max_results, 10);
        assert_eq!(config.weights.price_fit, 50.0);
        assert_eq!(config.weights.budget_fit, 25.0);
    }

    #[test]
    fn test_load_layers_file_and_environment() {
        // No other test reads these variables
        std::env::set_var("VENUE__SERVER__PORT", "9123");
        std::env::set_var("VENUE__MATCHING__MAX_RESULTS", "2");
        std::env::set_var("DATABASE_URL", "postgres://venue:secret@db:5432/venues");

        let loaded = Settings::load();

        std::env::remove_var("VENUE__SERVER__PORT");
        std::env::remove_var("VENUE__MATCHING__MAX_RESULTS");
        std::env::remove_var("DATABASE_URL");

        let settings = loaded.unwrap();

        // From config/default.toml
        assert_eq!(settings.catalog.backend, CatalogBackend::Memory);
        assert_eq!(settings.catalog.seed_path.as_deref(), Some("data/venues.json"));

        // From the environment
        assert_eq!(settings.server.port, 9123);
        assert_eq!(settings.match_config().max_results, 2);
        assert_eq!(settings.database.url, "postgres://venue:secret@db:5432/venues");
    }
}
