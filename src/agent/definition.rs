// ABOUTME: Agent configuration - model, prompt, and loop limits for a session.
// ABOUTME: Built with chained setters; validated values come from Config.

use std::time::Duration;

use super::prompt::SYSTEM_PROMPT;

/// Default cap on reasoning steps per user turn.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Default timeout for a single LLM call.
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for an agent session.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier sent with every request.
    pub model: String,

    /// System instructions sent with every request.
    pub system_prompt: String,

    /// Maximum reasoning steps per user turn.
    pub max_iterations: usize,

    /// Timeout applied to each LLM call.
    pub llm_timeout: Duration,

    pub max_tokens: Option<u32>,

    pub temperature: f64,
}

impl AgentConfig {
    /// Create a config for `model` with the default read-only instructions.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
            max_tokens: Some(4096),
            temperature: 0.0,
        }
    }

    /// Replace the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set maximum iterations.
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}
