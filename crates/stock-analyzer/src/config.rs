//! Configuration for the stock dashboard

use crate::error::{DashboardError, Result};
use analyzer_llm::providers::{GROQ_API_BASE, OpenAIConfig};
use analyzer_prompt::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// Completion parameters handed to the narrative analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Model identifier understood by the endpoint
    pub model: String,

    /// Sampling temperature; `None` leaves it to the provider
    pub temperature: Option<f32>,

    /// Completion token limit; unset by default so the narrative is never cut short
    pub max_tokens: Option<usize>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
        }
    }
}

/// Configuration for the dashboard process
#[derive(Clone)]
pub struct DashboardConfig {
    /// Credential for the completion endpoint
    pub api_key: String,

    /// Base URL of the OpenAI-compatible endpoint
    pub api_base: String,

    pub llm: LlmSettings,

    /// Language the narrative is requested in
    pub language: Language,

    /// Web server bind address
    pub bind: SocketAddr,

    /// Timeout for every outbound HTTP request
    pub http_timeout: Duration,
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Load configuration from the process environment
    ///
    /// Reads `GROQ_API_KEY` (or `GROOQ_API_KEY`), `GROQ_API_BASE`,
    /// `GROQ_MODEL`, `ANALYZER_TEMPERATURE`, `ANALYZER_MAX_TOKENS`,
    /// `ANALYZER_LANGUAGE`, `ANALYZER_BIND` and `ANALYZER_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("GROQ_API_KEY")
            .or_else(|| var("GROOQ_API_KEY"))
            .ok_or_else(|| {
                DashboardError::ConfigError(
                    "GROQ_API_KEY environment variable not set".to_string(),
                )
            })?;

        let mut builder = Self::builder().api_key(api_key);

        if let Some(base) = var("GROQ_API_BASE") {
            builder = builder.api_base(base);
        }
        if let Some(model) = var("GROQ_MODEL") {
            builder = builder.model(model);
        }
        if let Some(raw) = var("ANALYZER_TEMPERATURE") {
            builder = builder.temperature(parse_var("ANALYZER_TEMPERATURE", &raw)?);
        }
        if let Some(raw) = var("ANALYZER_MAX_TOKENS") {
            builder = builder.max_tokens(parse_var("ANALYZER_MAX_TOKENS", &raw)?);
        }
        if let Some(lang) = var("ANALYZER_LANGUAGE") {
            builder = builder.language(Language::from_code(&lang));
        }
        if let Some(raw) = var("ANALYZER_BIND") {
            builder = builder.bind(parse_var("ANALYZER_BIND", &raw)?);
        }
        if let Some(raw) = var("ANALYZER_HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse_var("ANALYZER_HTTP_TIMEOUT_SECS", &raw)?;
            builder = builder.http_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(DashboardError::ConfigError(
                "API key must not be empty".to_string(),
            ));
        }

        if let Some(t) = self.llm.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            return Err(DashboardError::ConfigError(format!(
                "temperature must be between 0.0 and 2.0, got {t}"
            )));
        }

        if self.llm.max_tokens == Some(0) {
            return Err(DashboardError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Provider configuration for the completion endpoint
    pub fn provider_config(&self) -> OpenAIConfig {
        OpenAIConfig::groq(self.api_key.clone())
            .with_api_base(self.api_base.clone())
            .with_timeout(self.http_timeout.as_secs())
    }
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("llm", &self.llm)
            .field("language", &self.language)
            .field("bind", &self.bind)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| DashboardError::ConfigError(format!("invalid {name} '{raw}': {e}")))
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    language: Option<Language>,
    bind: Option<SocketAddr>,
    http_timeout: Option<Duration>,
}

impl DashboardConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the endpoint base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the narrative language
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Set the web bind address
    pub fn bind(mut self, bind: SocketAddr) -> Self {
        self.bind = Some(bind);
        self
    }

    /// Set the outbound HTTP timeout
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = LlmSettings::default();
        let bind = match self.bind {
            Some(bind) => bind,
            None => parse_var("bind address", DEFAULT_BIND)?,
        };

        let config = DashboardConfig {
            api_key: self.api_key.unwrap_or_default(),
            api_base: self.api_base.unwrap_or_else(|| GROQ_API_BASE.to_string()),
            llm: LlmSettings {
                model: self.model.unwrap_or(defaults.model),
                temperature: self.temperature.or(defaults.temperature),
                max_tokens: self.max_tokens.or(defaults.max_tokens),
            },
            language: self.language.unwrap_or(Language::Indonesian),
            bind,
            http_timeout: self
                .http_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        };

        config.validate()?;
        Ok(config)
    }
}
