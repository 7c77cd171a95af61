#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime dashboard server.

use clap::{Parser, Subcommand};
use crime_dashboard_server::{ServerConfig, ServerError, interactive, run_server};
use crime_dashboard_source::registry::all_sources;

#[derive(Parser)]
#[command(name = "crime_dashboard_server", about = "Crime dashboard web server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Address to bind (overrides `BIND_ADDR`)
    #[arg(long)]
    bind: Option<String>,
    /// Port to listen on (overrides `PORT`)
    #[arg(long)]
    port: Option<u16>,
    /// Source definition id (overrides `CRIME_DASHBOARD_SOURCE`)
    #[arg(long)]
    source: Option<String>,
    /// Maximum incident rows rendered in the page table (overrides `CRIME_DASHBOARD_MAX_ROWS`)
    #[arg(long)]
    max_rows: Option<usize>,
    /// Prompt for settings before starting
    #[arg(long)]
    interactive: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all configured data sources
    Sources,
}

impl Cli {
    fn config(&self) -> ServerConfig {
        let mut config = ServerConfig::from_env();
        if let Some(bind) = &self.bind {
            config.bind_addr.clone_from(bind);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(source) = &self.source {
            config.source_id.clone_from(source);
        }
        if let Some(max_rows) = self.max_rows {
            config.max_table_rows = max_rows;
        }
        config
    }
}

fn list_sources() -> Result<(), ServerError> {
    let sources = all_sources()?;
    println!("{:<20} NAME", "ID");
    println!("{}", "-".repeat(50));
    for source in &sources {
        println!("{:<20} {}", source.id(), source.name());
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Sources)) {
        return list_sources();
    }

    let config = cli.config();
    if cli.interactive {
        interactive::run(config).await
    } else {
        run_server(config).await
    }
}
