//! Scripted completion client for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::client::CompletionClient;
use crate::error::{AgentError, Result};
use crate::message::Message;

/// Replays canned replies in order and records every request
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedClient {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failing reply after the current script
    pub fn then_fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .push_back(Err(AgentError::Completion(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _model: &str, messages: &[Message]) -> Result<String> {
        self.calls.lock().push(messages.to_vec());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Completion("script exhausted".to_string())))
    }
}
