//! Error types shared by agents, tools and the completion client

use thiserror::Error;

/// Errors surfaced by the agent core
#[derive(Debug, Error)]
pub enum AgentError {
    /// No registered tool matches the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The tool itself failed
    #[error("{message}")]
    ToolExecution { tool: String, message: String },

    /// The completion client failed (transport, status, malformed body)
    #[error("Completion failed: {0}")]
    Completion(String),
}

impl AgentError {
    /// Tool-originated errors are fed back to the model instead of aborting
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::ToolExecution { .. })
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Completion("request timed out".to_string())
        } else {
            Self::Completion(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
