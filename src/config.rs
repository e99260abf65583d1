use crate::core::{matcher::MatcherConfig, MatchOptions};
use crate::models::{DiversityWeights, ScoringWeights};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub diversity: DiversitySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_team_size")]
    pub default_team_size: usize,
    #[serde(default = "default_min_score")]
    pub default_min_score: f64,
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,
    #[serde(default = "default_max_combinations")]
    pub max_combinations: usize,
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
    /// Size of the dedicated scoring pool; the global rayon pool when unset
    pub worker_threads: Option<usize>,
    /// JSON array of profiles loaded at startup
    pub profiles_path: Option<String>,
    #[serde(default = "default_match_ttl_hours")]
    pub match_ttl_hours: i64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_team_size: default_team_size(),
            default_min_score: default_min_score(),
            default_max_results: default_max_results(),
            max_combinations: default_max_combinations(),
            recommendation_limit: default_recommendation_limit(),
            worker_threads: None,
            profiles_path: None,
            match_ttl_hours: default_match_ttl_hours(),
        }
    }
}

fn default_team_size() -> usize { 4 }
fn default_min_score() -> f64 { 0.6 }
fn default_max_results() -> usize { 10 }
fn default_max_combinations() -> usize { 100 }
fn default_recommendation_limit() -> usize { 20 }
fn default_match_ttl_hours() -> i64 { 72 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_preferences_weight")]
    pub preferences: f64,
    #[serde(default = "default_communication_weight")]
    pub communication: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
            preferences: default_preferences_weight(),
            communication: default_communication_weight(),
            availability: default_availability_weight(),
        }
    }
}

fn default_skills_weight() -> f64 { 0.30 }
fn default_experience_weight() -> f64 { 0.25 }
fn default_preferences_weight() -> f64 { 0.20 }
fn default_communication_weight() -> f64 { 0.15 }
fn default_availability_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct DiversitySettings {
    #[serde(default = "default_diversity_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub weights: DiversityWeightsConfig,
}

impl Default for DiversitySettings {
    fn default() -> Self {
        Self {
            threshold: default_diversity_threshold(),
            weights: DiversityWeightsConfig::default(),
        }
    }
}

fn default_diversity_threshold() -> f64 { 0.6 }

#[derive(Debug, Clone, Deserialize)]
pub struct DiversityWeightsConfig {
    #[serde(default = "default_diversity_skills")]
    pub skills: f64,
    #[serde(default = "default_diversity_experience")]
    pub experience: f64,
    #[serde(default = "default_diversity_education")]
    pub education: f64,
    #[serde(default = "default_diversity_languages")]
    pub languages: f64,
    #[serde(default = "default_diversity_age")]
    pub age: f64,
}

impl Default for DiversityWeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_diversity_skills(),
            experience: default_diversity_experience(),
            education: default_diversity_education(),
            languages: default_diversity_languages(),
            age: default_diversity_age(),
        }
    }
}

fn default_diversity_skills() -> f64 { 0.40 }
fn default_diversity_experience() -> f64 { 0.25 }
fn default_diversity_education() -> f64 { 0.15 }
fn default_diversity_languages() -> f64 { 0.10 }
fn default_diversity_age() -> f64 { 0.10 }

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
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with HACKMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., HACKMATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        let w = &self.scoring.weights;
        ScoringWeights {
            skills: w.skills,
            experience: w.experience,
            preferences: w.preferences,
            communication: w.communication,
            availability: w.availability,
        }
    }

    pub fn diversity_weights(&self) -> DiversityWeights {
        let w = &self.diversity.weights;
        DiversityWeights {
            skills: w.skills,
            experience: w.experience,
            education: w.education,
            languages: w.languages,
            age: w.age,
        }
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            weights: self.scoring_weights(),
            diversity_weights: self.diversity_weights(),
            diversity_threshold: self.diversity.threshold,
            max_combinations: self.matching.max_combinations,
            recommendation_limit: self.matching.recommendation_limit,
        }
    }

    /// Request defaults for participant searches
    pub fn default_match_options(&self) -> MatchOptions {
        MatchOptions {
            team_size: self.matching.default_team_size,
            min_match_score: self.matching.default_min_score,
            max_results: self.matching.default_max_results,
            ..Default::default()
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("HACKMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
