// ABOUTME: Runtime configuration - credentials, model, limits and timeouts.
// ABOUTME: Holds defaults for every option and validates values before startup.

use std::time::Duration;

use crate::agent::{AgentConfig, DEFAULT_LLM_TIMEOUT, DEFAULT_MAX_ITERATIONS};
use crate::db::RetryPolicy;
use crate::error::ConfigError;
use crate::executor::{DEFAULT_MAX_ROWS, DEFAULT_QUERY_TIMEOUT, ExecutorSettings};
use crate::llm::{OPENROUTER_BASE_URL, OPENROUTER_DEFAULT_MODEL};

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Everything needed to start a session.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub database_url: String,
    pub model: String,
    pub base_url: String,
    pub max_rows: usize,
    pub query_timeout: Duration,
    pub llm_timeout: Duration,
    pub max_iterations: usize,
    pub max_retries: u32,
    pub temperature: f64,
}

impl Config {
    /// Config with the given credentials and defaults for everything else.
    pub fn new(api_key: impl Into<String>, database_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            database_url: database_url.into(),
            model: OPENROUTER_DEFAULT_MODEL.to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_retries: RetryPolicy::default().max_retries,
            temperature: 0.0,
        }
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing(API_KEY_VAR));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Missing(DATABASE_URL_VAR));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(invalid("base_url", "must be an http(s) URL"));
        }
        if self.max_rows == 0 {
            return Err(invalid("max_rows", "must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        if self.query_timeout.is_zero() {
            return Err(invalid("query_timeout", "must be greater than zero"));
        }
        if self.llm_timeout.is_zero() {
            return Err(invalid("llm_timeout", "must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "must be between 0.0 and 2.0"));
        }
        Ok(())
    }

    pub fn executor_settings(&self) -> ExecutorSettings {
        ExecutorSettings {
            max_rows: self.max_rows,
            timeout: self.query_timeout,
            retry: RetryPolicy {
                max_retries: self.max_retries,
                ..RetryPolicy::default()
            },
        }
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::new(&self.model)
            .max_iterations(self.max_iterations)
            .llm_timeout(self.llm_timeout)
            .temperature(self.temperature)
    }
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.to_string(),
    }
}
