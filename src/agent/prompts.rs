//! System prompts for the built-in agent roles

use super::tools::ToolRegistry;

/// Plain assistant prompt (basic agent, planner)
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Provide clear, accurate, and concise responses.";

/// Planner prompt used by the orchestrator
pub const PLANNER_SYSTEM_PROMPT: &str = "You are a planning assistant. \
Break the task into a short, concrete plan that another agent can execute. \
Reply with the plan only.";

/// Critic prompt used by the reflection wrapper
pub const REFLECTION_SYSTEM_PROMPT: &str = "You are a careful reviewer. \
Check the answer to the question for mistakes. Give brief feedback. \
If the answer is wrong or incomplete, end your reply with a line of the form \
'Final Answer: <corrected answer>'. If the answer is already correct, do not \
include a Final Answer line.";

/// Reasoning loop prompt describing the action protocol and the available tools
pub fn react_system_prompt(tools: &ToolRegistry) -> String {
    format!(
        r#"You are a helpful AI assistant that solves problems step by step.

You can use the following tools:
{}

To use a tool, reply with your reasoning followed by a single line:
Action: ToolName[input]

You will then receive the tool output as an Observation.
When you know the answer, reply with a single line:
Final Answer: <answer>"#,
        tools.describe()
    )
}
