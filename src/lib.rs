//! Agent Sandbox
//!
//! Language-model agents that reason, call tools, and critique their own
//! answers.
//!
//! # Features
//!
//! - **Basic agent**: single turn with a rolling memory window
//! - **ReAct loop**: `Action: Tool[input]` / `Final Answer:` protocol with a step budget
//! - **Reflection**: critique pass that may replace an answer
//! - **Orchestrator**: planner → executor → critic pipeline
//! - **Tools**: Calculator, Search, Execute behind a case-insensitive registry
//!
//! # Architecture
//!
//! ```text
//! Orchestrator ──► BasicAgent (planner) ──► CompletionClient
//!      │
//!      ├── ReActAgent (executor) ──► CompletionClient
//!      │        └── ToolRegistry (Calculator / Search / Execute)
//!      └── ReflectionAgent (critic, wraps executor) ──► CompletionClient
//! ```

pub mod agent;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod message;

pub use agent::{
    Agent, BasicAgent, LoopOutcome, Orchestrator, ParsedResponse, PipelineResult, ReActAgent,
    ReflectionAgent, Tool, ToolRegistry,
};
pub use client::{ClientConfig, CompletionClient, OpenAiClient};
pub use config::Config;
pub use error::{AgentError, Result};
pub use memory::{MemoryBuffer, SharedMemory};
pub use message::{Conversation, Message, Role};
