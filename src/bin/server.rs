//! `agent-bridge-server`: serves the bridge agents over the run protocol.

use clap::Parser;

use agent_bridge::config::BridgeConfig;
use agent_bridge::server::RunServer;

/// Serve the bridge agents over the run protocol (ACP).
#[derive(Parser, Debug)]
#[command(name = "agent-bridge-server", version)]
struct Args {
    /// Bind host (default: ACP_HOST or 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (default: ACP_PORT or 8002)
    #[arg(long)]
    port: Option<u16>,

    /// MCP tool-server endpoint (default: MCP_SERVER_URL)
    #[arg(long)]
    tool_url: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    agent_bridge::logging::init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BridgeConfig::from_env();
    if args.host.is_some() || args.port.is_some() {
        let host = args.host.unwrap_or_else(|| config.host().to_string());
        let port = args.port.unwrap_or(config.port());
        config = config.with_bind(host, port);
    }
    if let Some(url) = args.tool_url {
        config = config.with_tool_url(url);
    }
    tracing::debug!(?config, "Loaded configuration");

    RunServer::from_config(&config)?.run().await?;
    Ok(())
}
