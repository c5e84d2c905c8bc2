mod app;
mod commands;
mod transport;

use std::io;

use clap::Parser;
use todo_core::{ClientConfig, TodoClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::transport::UreqTransport;

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "Terminal todo list backed by a REST API")]
#[command(version)]
struct Cli {
    /// API root, absolute or relative to --origin (default: $TODO_API_BASE or /api)
    #[arg(long)]
    api_base: Option<String>,

    /// Origin a relative API root is resolved against (default: $TODO_API_ORIGIN or http://127.0.0.1:8000)
    #[arg(long)]
    origin: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the rendered list.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(api_base) = &cli.api_base {
        config = config.with_api_base(api_base);
    }
    if let Some(origin) = &cli.origin {
        config = config.with_origin(origin);
    }
    let base_url = config.base_url();
    info!(%base_url, "starting");

    let mut app = App::new(TodoClient::new(&base_url), UreqTransport::new());
    app.run(io::stdin().lock(), &mut io::stdout().lock())?;
    Ok(())
}
