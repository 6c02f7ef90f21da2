//! Tracing setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Human-readable logs on stderr. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "agent_bridge=debug,tower_http=debug,info"
    } else {
        "agent_bridge=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
