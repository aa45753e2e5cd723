//! Shared helpers for integration tests

#![allow(dead_code)]

use agent_sandbox::{AgentError, CompletionClient, Message, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Completion client that replays canned replies and records requests
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, Vec<Message>)>>,
}

impl ScriptedClient {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .push_back(Err(AgentError::Completion(message.to_string())));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn messages(&self, call: usize) -> Vec<Message> {
        self.calls.lock()[call].1.clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Every message content of one call joined into a single string
    pub fn context(&self, call: usize) -> String {
        self.messages(call)
            .iter()
            .map(|m| m.content().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String> {
        self.calls.lock().push((model.to_string(), messages.to_vec()));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Completion("script exhausted".to_string())))
    }
}
