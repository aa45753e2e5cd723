//! Interactive shell
//!
//! Builds the selected agent from [`Config`] and feeds it stdin lines until
//! `exit`/`quit` or end of input.

use anyhow::{bail, Result};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

use crate::agent::{Agent, BasicAgent, Orchestrator, ReActAgent, ReflectionAgent, ToolRegistry};
use crate::client::{CompletionClient, OpenAiClient};
use crate::config::Config;

/// Agent selectable from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentKind {
    #[default]
    Basic,
    React,
    Reflection,
    Multi,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::React => "react",
            Self::Reflection => "reflection",
            Self::Multi => "multi",
        }
    }
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "basic" | "simple" => Ok(Self::Basic),
            "react" | "reasoning-loop" => Ok(Self::React),
            "reflection" => Ok(Self::Reflection),
            "multi" | "orchestrator" => Ok(Self::Multi),
            other => bail!(
                "Unknown agent '{}' (expected basic, react, reflection or multi)",
                other
            ),
        }
    }
}

/// Build the selected agent over the HTTP completion client
pub fn build_agent(kind: AgentKind, config: &Config) -> Result<Arc<dyn Agent>> {
    let client: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(config.client_config())?);
    Ok(build_agent_with_client(kind, config, client))
}

/// Build the selected agent over any completion client
pub fn build_agent_with_client(
    kind: AgentKind,
    config: &Config,
    client: Arc<dyn CompletionClient>,
) -> Arc<dyn Agent> {
    let tools = || ToolRegistry::with_builtins(config.exec_timeout);
    let react = || {
        ReActAgent::new(Arc::clone(&client), &config.model, tools()).with_max_steps(config.max_steps)
    };

    match kind {
        AgentKind::Basic => Arc::new(
            BasicAgent::new(Arc::clone(&client), &config.model)
                .with_memory_capacity(config.memory_capacity),
        ),
        AgentKind::React => Arc::new(react()),
        AgentKind::Reflection => Arc::new(ReflectionAgent::new(
            Arc::clone(&client),
            &config.model,
            Arc::new(react()),
        )),
        AgentKind::Multi => Arc::new(Orchestrator::from_client(
            Arc::clone(&client),
            &config.model,
            tools(),
            config.max_steps,
        )),
    }
}

/// Read prompts line by line and write the agent's answers
///
/// Agent errors are reported and the session continues.
pub async fn run_session<R, W>(agent: &dyn Agent, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    info!("Session started with {} agent", agent.name());

    loop {
        output.write_all(b"You: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = line.trim();
        if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = match agent.respond(&line).await {
            Ok(answer) => format!("Agent: {}\n", answer),
            Err(e) => {
                error!("Agent failed: {}", e);
                format!("Error: {}\n", e)
            }
        };
        output.write_all(reply.as_bytes()).await?;
    }

    output.flush().await?;
    info!("Session ended");
    Ok(())
}
