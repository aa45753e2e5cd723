//! Multi-Agent Orchestration
//!
//! Three-stage pipeline:
//! - Planner turns the task into a plan
//! - Executor resolves the plan (normally a ReAct loop)
//! - Critic reviews the executor's result against the original task
//!
//! Stages run strictly in order. A failure in any stage aborts the run.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use super::basic::BasicAgent;
use super::prompts::PLANNER_SYSTEM_PROMPT;
use super::react::ReActAgent;
use super::reflection::ReflectionAgent;
use super::tools::ToolRegistry;
use super::Agent;
use crate::client::CompletionClient;
use crate::error::Result;

/// Intermediate values of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub run_id: String,
    pub task: String,
    pub plan: String,
    pub result: String,
    pub final_answer: String,
}

/// Planner → executor → critic pipeline
pub struct Orchestrator {
    planner: Arc<dyn Agent>,
    executor: Arc<dyn Agent>,
    critic: ReflectionAgent,
}

impl Orchestrator {
    /// Compose arbitrary stages
    pub fn new(planner: Arc<dyn Agent>, executor: Arc<dyn Agent>, critic: ReflectionAgent) -> Self {
        Self {
            planner,
            executor,
            critic,
        }
    }

    /// Standard pipeline: stateless planner, ReAct executor, critic wrapping the executor
    pub fn from_client(
        client: Arc<dyn CompletionClient>,
        model: &str,
        tools: ToolRegistry,
        max_steps: usize,
    ) -> Self {
        let planner: Arc<dyn Agent> = Arc::new(
            BasicAgent::new(Arc::clone(&client), model)
                .with_system_prompt(PLANNER_SYSTEM_PROMPT)
                .without_memory(),
        );
        let executor: Arc<dyn Agent> =
            Arc::new(ReActAgent::new(Arc::clone(&client), model, tools).with_max_steps(max_steps));
        let critic = ReflectionAgent::new(client, model, Arc::clone(&executor));

        Self::new(planner, executor, critic)
    }

    /// Run the pipeline and keep every stage's output
    pub async fn run_detailed(&self, task: &str) -> Result<PipelineResult> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!("pipeline", run_id = %run_id);

        self.run_stages(run_id, task).instrument(span).await
    }

    async fn run_stages(&self, run_id: String, task: &str) -> Result<PipelineResult> {
        info!("Planning task");
        let plan = self
            .planner
            .respond(&format!("Plan how to accomplish: {}", task))
            .await?;

        info!("Executing plan with {}", self.executor.name());
        let result = self.executor.respond(&plan).await?;

        // The critic judges the original task, not the plan
        info!("Critiquing result");
        let final_answer = self.critic.critique(task, &result).await?;

        Ok(PipelineResult {
            run_id,
            task: task.to_string(),
            plan,
            result,
            final_answer,
        })
    }

    /// Plan the task, execute it, and critique the result
    pub async fn run(&self, task: &str) -> Result<String> {
        Ok(self.run_detailed(task).await?.final_answer)
    }
}

#[async_trait]
impl Agent for Orchestrator {
    fn name(&self) -> &str {
        "orchestrator"
    }

    async fn respond(&self, task: &str) -> Result<String> {
        self.run(task).await
    }
}
