//! Agent System
//!
//! Composable language-model agents:
//! - Basic: one request/response turn with optional rolling memory
//! - ReAct: think/act loop over the tool registry
//! - Reflection: critique pass that may override a wrapped agent's answer
//! - Orchestrator: planner → executor → critic pipeline
//!
//! Every variant implements [`Agent`], so any of them can fill any slot
//! that takes an `Arc<dyn Agent>`.

use async_trait::async_trait;

use crate::error::Result;

pub mod basic;
pub mod orchestrator;
pub mod prompts;
pub mod react;
pub mod reflection;
pub mod tools;

#[cfg(test)]
mod testing;

pub use basic::BasicAgent;
pub use orchestrator::{Orchestrator, PipelineResult};
pub use react::{
    extract_final_answer, parse_response, ActionRequest, LoopOutcome, ParsedResponse, ReActAgent,
    Scratchpad, Termination, EXHAUSTED_ANSWER,
};
pub use reflection::{ReflectionAgent, ReflectionResult};
pub use tools::{Tool, ToolRegistry};

/// Single-method capability shared by every agent
#[async_trait]
pub trait Agent: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Produce an answer for `input`
    async fn respond(&self, input: &str) -> Result<String>;
}
