//! Interactive mode for the server.
//!
//! Prompts for bind address, port and source before starting the server.

use crime_dashboard_source::registry::all_sources;
use dialoguer::{Confirm, Input, Select};

use crate::{ServerConfig, ServerError};

/// Runs the server in interactive mode, prompting for configuration.
///
/// `defaults` (usually from the environment and CLI flags) pre-fill each
/// prompt. Delegates to [`super::run_server`] once confirmed.
///
/// # Errors
///
/// Returns [`ServerError::Prompt`] if a prompt cannot be shown,
/// [`ServerError::Source`] if the source registry fails to load, or any
/// error from the server itself.
#[allow(clippy::future_not_send)]
pub async fn run(defaults: ServerConfig) -> Result<(), ServerError> {
    println!("Crime Dashboard Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()?;

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()?;

    let sources = all_sources()?;
    let labels: Vec<String> = sources
        .iter()
        .map(|s| format!("{} ({})", s.name, s.id))
        .collect();
    let default_idx = sources
        .iter()
        .position(|s| s.id == defaults.source_id)
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Source")
        .items(&labels)
        .default(default_idx)
        .interact()?;
    let source_id = sources
        .get(idx)
        .map_or_else(|| defaults.source_id.clone(), |s| s.id.clone());

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port} serving {source_id}?"))
        .default(true)
        .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig {
        bind_addr,
        port,
        source_id,
        ..defaults
    })
    .await
}
