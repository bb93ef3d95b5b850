//! Layered configuration.
//!
//! Uses Figment to merge compiled defaults + `config.toml` + `config.<env>.toml`
//! + `POLYGLOT_*` env vars (nested keys separated by `__`, e.g.
//! `POLYGLOT_CHUNKING__TARGET_SIZE=800`).
use std::env;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub answer: AnswerConfig,
}

/// Sizes are measured in chars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Upper bound on a chunk's length.
    pub target_size: usize,
    /// Chars repeated between consecutive chunks of a page.
    pub overlap: usize,
    /// Shortest chunk emitted, except for a page that is shorter as a whole.
    pub min_size: usize,
    /// How far back from a cut point to look for a word boundary.
    pub boundary_window: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { target_size: 1000, overlap: 200, min_size: 100, boundary_window: 48 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 {
            return Err(Error::InvalidConfig("chunking.target_size must be positive".into()));
        }
        if self.overlap >= self.target_size {
            return Err(Error::InvalidConfig(format!(
                "chunking.overlap ({}) must be smaller than chunking.target_size ({})",
                self.overlap, self.target_size
            )));
        }
        if self.min_size > self.target_size {
            return Err(Error::InvalidConfig(format!(
                "chunking.min_size ({}) must not exceed chunking.target_size ({})",
                self.min_size, self.target_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Chunks scoring below this floor are never returned.
    pub min_score: f32,
    /// Added to every inverse document frequency. Zero keeps the plain smoothed IDF.
    pub idf_offset: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5, min_score: 0.05, idf_offset: 0.0 }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(Error::InvalidConfig(format!(
                "retrieval.min_score must lie in [0, 1], got {}",
                self.min_score
            )));
        }
        if !(self.idf_offset >= 0.0 && self.idf_offset.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "retrieval.idf_offset must be a finite non-negative number, got {}",
                self.idf_offset
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    pub timeout_secs: u64,
    /// Number of most recent chat messages forwarded to the generator.
    pub history_window: usize,
    /// Passages quoted by the offline extractive answerer.
    pub fallback_passages: usize,
    pub fallback_excerpt_chars: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, history_window: 6, fallback_passages: 3, fallback_excerpt_chars: 800 }
    }
}

impl AnswerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("answer.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_for_env(None)
    }

    pub fn load_for_env(env_name: Option<&str>) -> Result<Self> {
        let env_name = match env_name {
            Some(name) => name.to_string(),
            None => env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string()),
        };
        let config: Config = Self::figment(&env_name).extract()?;
        config.validate()?;
        tracing::debug!(env = %env_name, ?config, "configuration loaded");
        Ok(config)
    }

    pub fn figment(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("POLYGLOT_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.retrieval.validate()?;
        self.answer.validate()
    }
}
