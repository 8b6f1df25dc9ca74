//! Development proxy.
//!
//! Serves a static UI and forwards API calls to two backends behind a single
//! origin, so the browser never makes a cross-origin request.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                  DEV PROXY                   │
//!     Browser Request      │  ┌─────────┐    ┌──────────┐                 │
//!     ─────────────────────┼─▶│  http   │───▶│ routing  │                 │
//!                          │  │ server  │    │ dispatch │                 │
//!                          │  └─────────┘    └────┬─────┘                 │
//!                          │        ┌─────────────┼──────────────┐        │
//!                          │        ▼             ▼              ▼        │
//!                          │   ┌─────────┐  ┌──────────┐  ┌────────────┐  │
//!                          │   │preflight│  │  static  │  │  selector  │  │
//!                          │   │ 204+CORS│  │ ServeDir │  │ + forwarder│──┼──▶ primary / decision
//!                          │   └─────────┘  └──────────┘  └────────────┘  │     backend
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use dev_proxy::config::loader;
use dev_proxy::lifecycle::startup;
use dev_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "dev-proxy")]
#[command(about = "Static file server with an API proxy for local UI development", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides config file and PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Static asset root (overrides config file and STATIC_DIR).
    #[arg(short, long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = loader::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(dir) = cli.static_dir {
        config.static_files.root = dir;
    }

    logging::init(&config.observability.log_level);

    startup::run(config).await?;
    Ok(())
}
