//! ReAct Reasoning Loop
//!
//! Alternates model calls and tool calls until the model commits to an
//! answer or the step budget runs out:
//!
//! ```text
//! THINKING ──Final Answer──► DONE
//!    │  ▲ ──no marker──────► DONE (raw text is the answer)
//!    │  │ ──budget spent───► EXHAUSTED ("Unable to find answer")
//!    ▼  │
//!   ACTING (tool result or "Error: ..." becomes the observation)
//! ```
//!
//! Each model reply is classified exactly once by [`parse_response`].

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::prompts::react_system_prompt;
use super::tools::ToolRegistry;
use super::Agent;
use crate::client::CompletionClient;
use crate::error::Result;
use crate::message::{Conversation, Message};

/// Default step budget
pub const DEFAULT_MAX_STEPS: usize = 5;

/// Answer returned when the step budget runs out
pub const EXHAUSTED_ANSWER: &str = "Unable to find answer";

static RE_FINAL_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Final Answer\s*:\s*(.*)").unwrap());

static RE_ACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Action\s*:\s*(\w+)\[(.*)\]").unwrap());

/// Tool call requested by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub tool_name: String,
    pub tool_input: String,
}

/// Classification of one model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// `Final Answer: <text>` was present
    Final(String),
    /// `Action: Tool[input]` was present (and no final answer)
    Action(ActionRequest),
    /// Neither marker; the whole reply is treated as the answer
    Unstructured(String),
}

/// Classify a reply. A final answer beats an action when both appear.
pub fn parse_response(text: &str) -> ParsedResponse {
    if let Some(answer) = extract_final_answer(text) {
        return ParsedResponse::Final(answer);
    }

    if let Some(caps) = RE_ACTION.captures(text) {
        return ParsedResponse::Action(ActionRequest {
            tool_name: caps[1].to_string(),
            tool_input: caps[2].to_string(),
        });
    }

    ParsedResponse::Unstructured(text.to_string())
}

/// Trimmed text following the first `Final Answer:` marker, if any
pub fn extract_final_answer(text: &str) -> Option<String> {
    RE_FINAL_ANSWER
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// One thought/observation pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchpadEntry {
    pub thought: String,
    pub observation: String,
}

/// Trace accumulated within a single loop invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scratchpad {
    entries: Vec<ScratchpadEntry>,
}

impl Scratchpad {
    pub fn push(&mut self, thought: &str, observation: &str) {
        self.entries.push(ScratchpadEntry {
            thought: thought.to_string(),
            observation: observation.to_string(),
        });
    }

    pub fn entries(&self) -> &[ScratchpadEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Text sent back to the model as the assistant turn
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("Thought: {}\nObservation: {}", e.thought, e.observation))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// How a loop invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The model gave a `Final Answer:`
    Final,
    /// The model answered without protocol markers
    Unstructured,
    /// The step budget ran out
    Exhausted,
}

/// Result of [`ReActAgent::resolve`]
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub answer: String,
    /// Completion calls made
    pub steps: usize,
    pub termination: Termination,
    pub scratchpad: Scratchpad,
}

/// Reasoning loop agent
pub struct ReActAgent {
    client: Arc<dyn CompletionClient>,
    model: String,
    system_prompt: String,
    tools: ToolRegistry,
    max_steps: usize,
}

impl ReActAgent {
    /// Create an agent whose system prompt lists `tools`
    pub fn new(client: Arc<dyn CompletionClient>, model: &str, tools: ToolRegistry) -> Self {
        Self {
            client,
            model: model.to_string(),
            system_prompt: react_system_prompt(&tools),
            tools,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    fn build_messages(&self, question: &str, scratchpad: &Scratchpad) -> Conversation {
        let mut messages = vec![
            Message::system(self.system_prompt.as_str()),
            Message::user(question),
        ];
        if !scratchpad.is_empty() {
            messages.push(Message::assistant(scratchpad.render()));
        }
        messages
    }

    /// Run the loop and report how it ended
    pub async fn resolve(&self, question: &str) -> Result<LoopOutcome> {
        let mut scratchpad = Scratchpad::default();

        for step in 1..=self.max_steps {
            let messages = self.build_messages(question, &scratchpad);
            let output = self.client.complete(&self.model, &messages).await?;

            match parse_response(&output) {
                ParsedResponse::Final(answer) => {
                    info!("ReAct finished with final answer after {} step(s)", step);
                    return Ok(LoopOutcome {
                        answer,
                        steps: step,
                        termination: Termination::Final,
                        scratchpad,
                    });
                }
                ParsedResponse::Action(action) => {
                    debug!("Step {}: {}[{}]", step, action.tool_name, action.tool_input);

                    let observation = match self.tools.run_tool(&action.tool_name, &action.tool_input).await {
                        Ok(result) => result,
                        Err(e) => {
                            warn!("Tool {} failed: {}", action.tool_name, e);
                            format!("Error: {}", e)
                        }
                    };

                    scratchpad.push(&output, &observation);
                }
                ParsedResponse::Unstructured(text) => {
                    debug!("Step {}: no protocol markers, treating reply as answer", step);
                    return Ok(LoopOutcome {
                        answer: text,
                        steps: step,
                        termination: Termination::Unstructured,
                        scratchpad,
                    });
                }
            }
        }

        warn!("ReAct exhausted {} steps without a final answer", self.max_steps);
        Ok(LoopOutcome {
            answer: EXHAUSTED_ANSWER.to_string(),
            steps: self.max_steps,
            termination: Termination::Exhausted,
            scratchpad,
        })
    }
}

#[async_trait]
impl Agent for ReActAgent {
    fn name(&self) -> &str {
        "react"
    }

    async fn respond(&self, question: &str) -> Result<String> {
        Ok(self.resolve(question).await?.answer)
    }
}
