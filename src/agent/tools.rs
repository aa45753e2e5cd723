//! Tool Registry
//!
//! Named text-in/text-out tools with case-insensitive dispatch:
//! - Registration order is preserved for listing and prompt building
//! - Names are unique after case folding
//! - Tool failures are returned to the caller, never swallowed here

use anyhow::Result as AnyResult;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};

/// Type alias for tool handler function
pub type ToolHandler = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = AnyResult<String>> + Send>> + Send + Sync,
>;

/// A registered tool with its handler
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    handler: ToolHandler,
}

impl Tool {
    /// Create a new tool
    pub fn new<F, Fut>(name: &str, description: &str, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AnyResult<String>> + Send + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            handler: Arc::new(move |input| Box::pin(handler(input))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the tool on raw input text
    pub async fn invoke(&self, input: &str) -> AnyResult<String> {
        (self.handler)(input.to_string()).await
    }

    fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Tool registry for managing available tools
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with Calculator, Search and Execute
    pub fn with_builtins(exec_timeout: std::time::Duration) -> Self {
        let mut registry = Self::new();
        registry.register(builtin::calculator_tool());
        registry.register(builtin::search_tool());
        registry.register(builtin::execute_tool(exec_timeout));
        registry
    }

    /// Register a tool. A case-insensitive name clash replaces the old one in place.
    pub fn register(&mut self, tool: Tool) {
        if let Some(existing) = self.tools.iter_mut().find(|t| t.matches(&tool.name)) {
            warn!("Replacing tool {} with {}", existing.name, tool.name);
            *existing = tool;
        } else {
            info!("Registered tool: {}", tool.name);
            self.tools.push(tool);
        }
    }

    /// Get a tool by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.matches(name))
    }

    /// Tool names in registration order
    pub fn list_tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// One `Name: description` line per tool
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch `input` to the tool called `name`
    pub async fn run_tool(&self, name: &str, input: &str) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;

        debug!("Running tool {} with input: {}", tool.name, input);

        tool.invoke(input)
            .await
            .map_err(|e| AgentError::ToolExecution {
                tool: tool.name.clone(),
                message: e.to_string(),
            })
    }
}

/// Built-in tools
pub mod builtin {
    use super::*;
    use anyhow::{anyhow, bail};
    use std::process::Stdio;
    use std::time::Duration;
    use tokio::process::Command;

    /// Arithmetic expression evaluator
    pub fn calculator_tool() -> Tool {
        Tool::new(
            "Calculator",
            "Evaluate a math expression and return the result.",
            |expression| async move { calculate(&expression) },
        )
    }

    fn calculate(expression: &str) -> AnyResult<String> {
        let value = calc::evaluate(expression).map_err(|_| anyhow!("Invalid expression"))?;
        Ok(format!("{:?}", value))
    }

    /// Placeholder search tool
    pub fn search_tool() -> Tool {
        Tool::new("Search", "Return search results for a query.", |query| async move {
            Ok(format!("Results for: {}", query))
        })
    }

    /// Shell code execution (unsafe: runs arbitrary commands)
    ///
    /// Input is a POSIX `sh` script, not Python. The observation is the
    /// script's trimmed stdout; there is no `result` variable to assign.
    /// A non-zero exit fails with the exit code and trimmed stderr.
    pub fn execute_tool(timeout: Duration) -> Tool {
        Tool::new(
            "Execute",
            "Run a POSIX sh script and return its standard output (print the answer, e.g. `echo $((6*7))`).",
            move |code| async move { run_shell(&code, timeout).await },
        )
    }

    async fn run_shell(code: &str, timeout: Duration) -> AnyResult<String> {
        info!("Executing code ({} bytes)", code.len());

        let output = tokio::time::timeout(
            timeout,
            Command::new("sh")
                .arg("-c")
                .arg(code)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| anyhow!("Execution timed out after {} seconds", timeout.as_secs()))?
        .map_err(|e| anyhow!("Failed to execute code: {}", e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            );
        }

        Ok(stdout.trim().to_string())
    }

    /// Recursive-descent evaluator for `+ - * / % **` and parentheses
    pub(crate) mod calc {
        #[derive(Debug, Clone, Copy, PartialEq)]
        enum Token {
            Num(f64),
            Plus,
            Minus,
            Star,
            Slash,
            Percent,
            Pow,
            LParen,
            RParen,
        }

        #[derive(Debug, PartialEq)]
        pub struct CalcError;

        type CalcResult<T> = Result<T, CalcError>;

        fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
            let chars: Vec<char> = input.chars().collect();
            let mut tokens = Vec::new();
            let mut i = 0;

            while i < chars.len() {
                let c = chars[i];
                match c {
                    ' ' | '\t' | '\n' | '\r' => {}
                    '+' => tokens.push(Token::Plus),
                    '-' => tokens.push(Token::Minus),
                    '*' if chars.get(i + 1) == Some(&'*') => {
                        tokens.push(Token::Pow);
                        i += 1;
                    }
                    '*' => tokens.push(Token::Star),
                    '/' => tokens.push(Token::Slash),
                    '%' => tokens.push(Token::Percent),
                    '(' => tokens.push(Token::LParen),
                    ')' => tokens.push(Token::RParen),
                    c if c.is_ascii_digit() || c == '.' => {
                        let start = i;
                        while i + 1 < chars.len() && (chars[i + 1].is_ascii_digit() || chars[i + 1] == '.') {
                            i += 1;
                        }
                        let literal: String = chars[start..=i].iter().collect();
                        let value = literal.parse::<f64>().map_err(|_| CalcError)?;
                        tokens.push(Token::Num(value));
                    }
                    _ => return Err(CalcError),
                }
                i += 1;
            }

            Ok(tokens)
        }

        /// Deepest nesting of parentheses, signs and exponents accepted
        const MAX_DEPTH: usize = 100;

        struct Parser {
            tokens: Vec<Token>,
            pos: usize,
            depth: usize,
        }

        impl Parser {
            fn peek(&self) -> Option<Token> {
                self.tokens.get(self.pos).copied()
            }

            fn next(&mut self) -> Option<Token> {
                let token = self.peek();
                self.pos += 1;
                token
            }

            fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> CalcResult<T>) -> CalcResult<T> {
                if self.depth >= MAX_DEPTH {
                    return Err(CalcError);
                }
                self.depth += 1;
                let result = parse(self);
                self.depth -= 1;
                result
            }

            fn expr(&mut self) -> CalcResult<f64> {
                let mut value = self.term()?;
                while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = if op == Token::Plus { value + rhs } else { value - rhs };
                }
                Ok(value)
            }

            fn term(&mut self) -> CalcResult<f64> {
                let mut value = self.unary()?;
                while let Some(op @ (Token::Star | Token::Slash | Token::Percent)) = self.peek() {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    value = match op {
                        Token::Star => value * rhs,
                        _ if rhs == 0.0 => return Err(CalcError),
                        Token::Slash => value / rhs,
                        // Result takes the sign of the divisor
                        _ => value - rhs * (value / rhs).floor(),
                    };
                }
                Ok(value)
            }

            fn unary(&mut self) -> CalcResult<f64> {
                match self.peek() {
                    Some(Token::Minus) => {
                        self.pos += 1;
                        Ok(-self.nested(Self::unary)?)
                    }
                    Some(Token::Plus) => {
                        self.pos += 1;
                        self.nested(Self::unary)
                    }
                    _ => self.power(),
                }
            }

            // Right-associative, binds tighter than a unary minus on its left
            fn power(&mut self) -> CalcResult<f64> {
                let base = self.atom()?;
                if self.peek() == Some(Token::Pow) {
                    self.pos += 1;
                    let exponent = self.nested(Self::unary)?;
                    return Ok(base.powf(exponent));
                }
                Ok(base)
            }

            fn atom(&mut self) -> CalcResult<f64> {
                match self.next() {
                    Some(Token::Num(n)) => Ok(n),
                    Some(Token::LParen) => {
                        let value = self.nested(Self::expr)?;
                        match self.next() {
                            Some(Token::RParen) => Ok(value),
                            _ => Err(CalcError),
                        }
                    }
                    _ => Err(CalcError),
                }
            }
        }

        pub fn evaluate(input: &str) -> CalcResult<f64> {
            let tokens = tokenize(input)?;
            let mut parser = Parser {
                tokens,
                pos: 0,
                depth: 0,
            };
            let value = parser.expr()?;

            if parser.pos != parser.tokens.len() || !value.is_finite() {
                return Err(CalcError);
            }
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::builtin::calc::evaluate;
    use super::*;

    #[test]
    fn test_calculator_precedence() {
        assert_eq!(evaluate("2+2"), Ok(4.0));
        assert_eq!(evaluate("2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(evaluate("-2 ** 2"), Ok(-4.0));
        assert_eq!(evaluate("2 ** 3 ** 2"), Ok(512.0));
        assert_eq!(evaluate("7 % 3"), Ok(1.0));
        assert_eq!(evaluate("-7 % 3"), Ok(2.0));
        assert_eq!(evaluate("1.5 / 0.5"), Ok(3.0));
    }

    #[test]
    fn test_calculator_rejects_garbage() {
        assert!(evaluate("").is_err());
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(1").is_err());
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("import os").is_err());
        assert!(evaluate("1.2.3").is_err());
    }

    #[test]
    fn test_calculator_nesting_limit() {
        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(evaluate(&shallow), Ok(1.0));
        assert_eq!(evaluate(&format!("{}5", "-".repeat(50))), Ok(5.0));

        assert!(evaluate(&format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000))).is_err());
        assert!(evaluate(&format!("{}1", "-".repeat(5_000))).is_err());
        assert!(evaluate(&vec!["2"; 5_000].join("**")).is_err());
    }

    #[tokio::test]
    async fn test_deep_nesting_is_tool_error() {
        let registry = ToolRegistry::with_builtins(std::time::Duration::from_secs(5));
        let input = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));

        let err = registry.run_tool("Calculator", &input).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid expression");
    }

    #[tokio::test]
    async fn test_builtin_registration_order() {
        let registry = ToolRegistry::with_builtins(std::time::Duration::from_secs(5));
        assert_eq!(registry.list_tool_names(), vec!["Calculator", "Search", "Execute"]);
        assert!(registry.describe().starts_with("Calculator: "));
        assert!(registry.get("execute").unwrap().description().contains("POSIX sh"));
    }

    #[tokio::test]
    async fn test_case_insensitive_dispatch() {
        let registry = ToolRegistry::with_builtins(std::time::Duration::from_secs(5));

        let upper = registry.run_tool("CALCULATOR", "2+2").await.unwrap();
        let lower = registry.run_tool("calculator", "2+2").await.unwrap();
        assert_eq!(upper, "4.0");
        assert_eq!(upper, lower);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.run_tool("Nope", "x").await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(ref name) if name == "Nope"));
    }

    #[tokio::test]
    async fn test_tool_failure_is_not_swallowed() {
        let registry = ToolRegistry::with_builtins(std::time::Duration::from_secs(5));
        let err = registry.run_tool("Calculator", "2 +").await.unwrap_err();
        match err {
            AgentError::ToolExecution { tool, message } => {
                assert_eq!(tool, "Calculator");
                assert_eq!(message, "Invalid expression");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_replaces_case_folded_name() {
        let mut registry = ToolRegistry::new();
        registry.register(builtin::search_tool());
        registry.register(Tool::new("echo", "Echo input", |s| async move { Ok(s) }));
        registry.register(Tool::new("SEARCH", "Override", |_| async move {
            Ok("override".to_string())
        }));

        assert_eq!(registry.list_tool_names(), vec!["SEARCH", "echo"]);
        assert_eq!(registry.run_tool("search", "q").await.unwrap(), "override");
    }

    #[tokio::test]
    async fn test_search_tool() {
        let registry = ToolRegistry::with_builtins(std::time::Duration::from_secs(5));
        let result = registry.run_tool("search", "rust async").await.unwrap();
        assert_eq!(result, "Results for: rust async");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_tool() {
        let registry = ToolRegistry::with_builtins(std::time::Duration::from_secs(5));
        let result = registry.run_tool("Execute", "echo hello").await.unwrap();
        assert_eq!(result, "hello");

        let err = registry.run_tool("execute", "exit 3").await.unwrap_err();
        assert!(err.to_string().contains("exit code 3"));
    }
}
