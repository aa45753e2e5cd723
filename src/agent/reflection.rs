//! Reflection & Self-Correction
//!
//! Wraps any [`Agent`] and runs one critique turn over its answer:
//! - The critic sees the question and the answer
//! - A `Final Answer:` line in the critique replaces the answer
//! - No marker means the answer stands unchanged

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::prompts::REFLECTION_SYSTEM_PROMPT;
use super::react::extract_final_answer;
use super::Agent;
use crate::client::CompletionClient;
use crate::error::Result;
use crate::message::Message;

/// Result of one critique turn
#[derive(Debug, Clone)]
pub struct ReflectionResult {
    /// Answer under review
    pub original: String,
    /// Raw critic reply
    pub feedback: String,
    /// Corrected answer, if the critic gave one
    pub revised: Option<String>,
    /// Answer to use
    pub final_response: String,
}

/// Critique wrapper around a base agent
pub struct ReflectionAgent {
    base: Arc<dyn Agent>,
    client: Arc<dyn CompletionClient>,
    model: String,
    critique_prompt: String,
}

impl ReflectionAgent {
    pub fn new(client: Arc<dyn CompletionClient>, model: &str, base: Arc<dyn Agent>) -> Self {
        Self {
            base,
            client,
            model: model.to_string(),
            critique_prompt: REFLECTION_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_critique_prompt(mut self, prompt: &str) -> Self {
        self.critique_prompt = prompt.to_string();
        self
    }

    pub fn base(&self) -> &Arc<dyn Agent> {
        &self.base
    }

    /// Run the critique turn and keep the full feedback
    pub async fn review(&self, question: &str, answer: &str) -> Result<ReflectionResult> {
        let messages = vec![
            Message::system(self.critique_prompt.as_str()),
            Message::user(format!(
                "Question: {}\nAnswer: {}\nProvide feedback and, if needed, a corrected final answer.",
                question, answer
            )),
        ];

        let feedback = self.client.complete(&self.model, &messages).await?;
        let revised = extract_final_answer(&feedback);

        let final_response = match &revised {
            Some(corrected) => {
                info!("Critic replaced the answer");
                corrected.clone()
            }
            None => {
                debug!("Critic kept the original answer");
                answer.to_string()
            }
        };

        Ok(ReflectionResult {
            original: answer.to_string(),
            feedback,
            revised,
            final_response,
        })
    }

    /// Critique a precomputed answer and return the answer to use
    pub async fn critique(&self, question: &str, answer: &str) -> Result<String> {
        Ok(self.review(question, answer).await?.final_response)
    }
}

#[async_trait]
impl Agent for ReflectionAgent {
    fn name(&self) -> &str {
        "reflection"
    }

    async fn respond(&self, question: &str) -> Result<String> {
        let initial = self.base.respond(question).await?;
        self.critique(question, &initial).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedClient;
    use crate::agent::BasicAgent;
    use crate::error::AgentError;

    /// Base agent with a fixed answer
    struct Fixed(&'static str);

    #[async_trait]
    impl Agent for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn respond(&self, _input: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_correction_replaces_answer() {
        let client = Arc::new(ScriptedClient::new(&["That is wrong.\nFinal Answer: good"]));
        let agent = ReflectionAgent::new(client.clone(), "m", Arc::new(Fixed("bad answer")));

        assert_eq!(agent.respond("q").await.unwrap(), "good");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_marker_keeps_answer_exactly() {
        let original = "  42, with spacing\tkept ";
        let client = Arc::new(ScriptedClient::new(&["Looks correct to me."]));
        let agent = ReflectionAgent::new(client, "m", Arc::new(Fixed("unused")));

        let result = agent.review("q", original).await.unwrap();
        assert_eq!(result.final_response, original);
        assert!(result.revised.is_none());
        assert_eq!(result.feedback, "Looks correct to me.");
    }

    #[tokio::test]
    async fn test_critique_message_layout() {
        let client = Arc::new(ScriptedClient::new(&["fine"]));
        let agent = ReflectionAgent::new(client.clone(), "m", Arc::new(Fixed("x")))
            .with_critique_prompt("critic");

        agent.critique("What is 2+2?", "4").await.unwrap();

        let call = &client.calls()[0];
        assert_eq!(call[0], Message::system("critic"));
        assert_eq!(
            call[1],
            Message::user(
                "Question: What is 2+2?\nAnswer: 4\nProvide feedback and, if needed, a corrected final answer."
            )
        );
    }

    #[tokio::test]
    async fn test_wraps_any_agent() {
        // Base and critic share one scripted client: base reply first, then critique
        let client = Arc::new(ScriptedClient::new(&["base says 5", "Final Answer: 4"]));
        let base = Arc::new(BasicAgent::new(client.clone(), "m").without_memory());
        let agent = ReflectionAgent::new(client.clone(), "m", base);

        assert_eq!(agent.respond("2+2?").await.unwrap(), "4");
        assert!(client.calls()[1][1].content().contains("Answer: base says 5"));
    }

    #[tokio::test]
    async fn test_base_failure_skips_critique() {
        let client = Arc::new(ScriptedClient::new(&[]).then_fail("down"));
        let base = Arc::new(BasicAgent::new(client.clone(), "m"));
        let agent = ReflectionAgent::new(client.clone(), "m", base);

        let err = agent.respond("q").await.unwrap_err();
        assert!(matches!(err, AgentError::Completion(_)));
        assert_eq!(client.call_count(), 1);
    }
}
