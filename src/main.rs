//! Agent Sandbox - Entry Point
//!
//! Agents:
//! - basic (default): single turn with memory
//! - react: reasoning loop with tools
//! - reflection: reasoning loop plus critique
//! - multi: planner → executor → critic

use agent_sandbox::cli::{self, AgentKind};
use agent_sandbox::Config;
use tokio::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Parse args
    let args: Vec<String> = std::env::args().collect();
    let help_mode = args.iter().any(|a| a == "--help" || a == "-h");

    if help_mode {
        println!("Agent Sandbox v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage: agent-sandbox [--agent basic|react|reflection|multi]");
        println!();
        println!("Options:");
        println!("  --agent, -a <NAME>  Agent to run (default: basic)");
        println!("  --help, -h          Show this help");
        println!();
        println!("Type 'exit' or 'quit' to leave the session.");
        println!();
        println!("Environment variables:");
        println!("  OPENAI_API_KEY               API key for chat completions");
        println!("  OPENAI_BASE_URL              API base URL (default: https://api.openai.com/v1)");
        println!("  AGENT_MODEL                  Model id (default: gpt-3.5-turbo)");
        println!("  AGENT_MAX_STEPS              Reasoning loop budget (default: 5)");
        println!("  AGENT_MEMORY_CAPACITY        Basic agent memory window (default: 10)");
        println!("  AGENT_REQUEST_TIMEOUT_SECS   HTTP timeout (default: 60)");
        println!("  AGENT_EXEC_TIMEOUT_SECS      Execute tool timeout (default: 30)");
        return Ok(());
    }

    let kind = match args
        .iter()
        .position(|a| a == "--agent" || a == "-a")
        .map(|i| args.get(i + 1))
    {
        Some(Some(name)) => name.parse::<AgentKind>()?,
        Some(None) => anyhow::bail!("--agent requires a value"),
        None => AgentKind::default(),
    };

    // Logs go to stderr so the conversation on stdout stays clean
    let log_level = std::env::var("RUST_LOG")
        .map(|s| match s.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        })
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Agent Sandbox v{} ({} agent)", env!("CARGO_PKG_VERSION"), kind.as_str());

    let config = Config::from_env()?;
    let agent = cli::build_agent(kind, &config)?;

    cli::run_session(agent.as_ref(), BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    Ok(())
}
