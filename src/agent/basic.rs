//! Basic Agent
//!
//! One request/response turn. The conversation sent to the model is the
//! system prompt, then the memory window, then the new user message.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::prompts::DEFAULT_SYSTEM_PROMPT;
use super::Agent;
use crate::client::CompletionClient;
use crate::error::Result;
use crate::memory::{MemoryBuffer, SharedMemory, DEFAULT_CAPACITY};
use crate::message::{Conversation, Message, Role};

/// Single-turn agent with optional rolling memory
pub struct BasicAgent {
    client: Arc<dyn CompletionClient>,
    model: String,
    system_prompt: String,
    memory: Option<SharedMemory>,
}

impl BasicAgent {
    /// Create an agent owning a fresh memory buffer of the default capacity
    pub fn new(client: Arc<dyn CompletionClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            memory: Some(MemoryBuffer::shared(DEFAULT_CAPACITY)),
        }
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Replace the owned buffer with a fresh one of `capacity`
    pub fn with_memory_capacity(mut self, capacity: usize) -> Self {
        self.memory = Some(MemoryBuffer::shared(capacity));
        self
    }

    /// Use a caller-provided buffer, possibly shared with other agents
    pub fn with_memory(mut self, memory: SharedMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Stateless mode: every turn sees only the system prompt and the prompt
    pub fn without_memory(mut self) -> Self {
        self.memory = None;
        self
    }

    pub fn memory(&self) -> Option<&SharedMemory> {
        self.memory.as_ref()
    }

    fn build_messages(&self, prompt: &str) -> Conversation {
        let mut messages = vec![Message::system(self.system_prompt.as_str())];
        if let Some(memory) = &self.memory {
            messages.extend(memory.lock().get_messages());
        }
        messages.push(Message::user(prompt));
        messages
    }
}

#[async_trait]
impl Agent for BasicAgent {
    fn name(&self) -> &str {
        "basic"
    }

    async fn respond(&self, prompt: &str) -> Result<String> {
        let messages = self.build_messages(prompt);
        debug!("Basic agent sending {} messages", messages.len());

        let reply = self.client.complete(&self.model, &messages).await?;

        if let Some(memory) = &self.memory {
            let mut memory = memory.lock();
            memory.add(Role::User, prompt);
            memory.add(Role::Assistant, reply.as_str());
        }

        Ok(reply)
    }
}
