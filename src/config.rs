//! Configuration management

use anyhow::Result;
use std::time::Duration;

use crate::client::ClientConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key (optional - completions fail without it)
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// Reasoning loop step budget
    pub max_steps: usize,

    /// Messages kept by the basic agent's memory
    pub memory_capacity: usize,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,

    /// Timeout for the Execute tool
    pub exec_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_steps: crate::agent::react::DEFAULT_MAX_STEPS,
            memory_capacity: crate::memory::DEFAULT_CAPACITY,
            request_timeout: Duration::from_secs(60),
            exec_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let base_url = std::env::var("OPENAI_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let model = std::env::var("AGENT_MODEL").unwrap_or(defaults.model);

        let max_steps = env_parse("AGENT_MAX_STEPS").unwrap_or(defaults.max_steps);

        let memory_capacity =
            env_parse("AGENT_MEMORY_CAPACITY").unwrap_or(defaults.memory_capacity);

        let request_timeout = env_parse("AGENT_REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let exec_timeout = env_parse("AGENT_EXEC_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.exec_timeout);

        Ok(Self {
            api_key,
            base_url,
            model,
            max_steps,
            memory_capacity,
            request_timeout,
            exec_timeout,
        })
    }

    /// Settings for the HTTP completion client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: self.request_timeout,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
