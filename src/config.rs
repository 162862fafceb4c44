use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::{AdmissionThresholds, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    #[serde(default)]
    pub allow_admin_registration: bool,
}

fn default_token_ttl() -> u64 { 86_400 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_size")]
    pub l1_cache_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            l1_cache_size: default_cache_size(),
        }
    }
}

fn default_cache_ttl() -> u64 { 300 }
fn default_cache_size() -> u64 { 64 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_gpa_floor")]
    pub gpa_floor: f64,
    #[serde(default = "default_gpa_multiplier")]
    pub gpa_multiplier: f64,
    #[serde(default = "default_role_match")]
    pub role_match: f64,
    #[serde(default = "default_experience")]
    pub experience: f64,
    #[serde(default = "default_shared_skill")]
    pub shared_skill: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            gpa_floor: default_gpa_floor(),
            gpa_multiplier: default_gpa_multiplier(),
            role_match: default_role_match(),
            experience: default_experience(),
            shared_skill: default_shared_skill(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            gpa_floor: config.gpa_floor,
            gpa_multiplier: config.gpa_multiplier,
            role_match: config.role_match,
            experience: config.experience,
            shared_skill: config.shared_skill,
        }
    }
}

fn default_gpa_floor() -> f64 { 2.5 }
fn default_gpa_multiplier() -> f64 { 10.0 }
fn default_role_match() -> f64 { 10.0 }
fn default_experience() -> f64 { 5.0 }
fn default_shared_skill() -> f64 { 3.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_job_threshold")]
    pub job: f64,
    #[serde(default = "default_peer_threshold")]
    pub peer: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            job: default_job_threshold(),
            peer: default_peer_threshold(),
        }
    }
}

impl From<&ThresholdsConfig> for AdmissionThresholds {
    fn from(config: &ThresholdsConfig) -> Self {
        Self {
            job: config.job,
            peer: config.peer,
        }
    }
}

fn default_job_threshold() -> f64 { 15.0 }
fn default_peer_threshold() -> f64 { 10.0 }

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

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sender")]
    pub sender: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: default_sender(),
        }
    }
}

fn default_sender() -> String { "no-reply@gradjobs.local".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Optional local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GRADJOBS__)
    /// 5. `DATABASE_URL` and `JWT_SECRET`
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GRADJOBS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("GRADJOBS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_shortcuts(settings)?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    pub fn admission_thresholds(&self) -> AdmissionThresholds {
        AdmissionThresholds::from(&self.scoring.thresholds)
    }
}

/// Honour the conventional `DATABASE_URL` and `JWT_SECRET` variables
fn apply_env_shortcuts(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = AdmissionThresholds::from(&ThresholdsConfig::default());
        assert_eq!(thresholds.job, 15.0);
        assert_eq!(thresholds.peer, 10.0);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_double_underscore_env_prefix() {
        std::env::set_var("GRADJOBS__SERVER__PORT", "2299");
        let settings = Settings::load().unwrap();
        std::env::remove_var("GRADJOBS__SERVER__PORT");

        assert_eq!(settings.server.port, 2299);
    }

    #[test]
    fn test_minimal_toml() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"
                [server]
                host = "127.0.0.1"
                port = 2200

                [database]
                url = "sqlite::memory:"

                [auth]
                jwt_secret = "test"

                [scoring.thresholds]
                peer = 12.0
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 2200);
        assert_eq!(settings.auth.token_ttl_secs, 86_400);
        assert_eq!(settings.admission_thresholds().peer, 12.0);
        assert_eq!(settings.admission_thresholds().job, 15.0);
        assert_eq!(settings.scoring_weights().shared_skill, 3.0);
    }
}
