//! `agent-bridge`: command-line client for run-protocol servers.

use clap::Parser;

use agent_bridge::cli::{self, Action, Cli};
use agent_bridge::client::RunClient;
use agent_bridge::config::BridgeConfig;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    agent_bridge::logging::init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> agent_bridge::error::Result<()> {
    let mut config = BridgeConfig::from_env();
    if let Some(url) = &args.url {
        config = config.with_run_url(url);
    }
    let client = RunClient::new(&config)?;

    match args.action() {
        Action::Interactive => cli::run_interactive(&client).await,
        action => {
            println!("{}", cli::execute(&client, &action).await?);
            Ok(())
        }
    }
}
