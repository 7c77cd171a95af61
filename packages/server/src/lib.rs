#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the crime dashboard.
//!
//! Every request is stateless: the incident table is fetched from the
//! configured source, filtered and aggregated in memory, rendered, and
//! dropped. `/` serves the HTML dashboard; `/api/summary` serves the same
//! aggregates as JSON.

pub mod dashboard;
mod handlers;
pub mod interactive;
pub mod page;

#[cfg(test)]
mod test_source;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crime_dashboard_source::registry::{DEFAULT_SOURCE_ID, find_source};
use crime_dashboard_source::source_def::ConfiguredSource;
use crime_dashboard_source::{CrimeSource, SourceError};
use crime_dashboard_source_models::SourceDefinition;
use thiserror::Error;

/// Environment variable for the bind address.
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";
/// Environment variable for the listen port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable selecting the source definition.
pub const SOURCE_ENV: &str = "CRIME_DASHBOARD_SOURCE";
/// Environment variable capping the incident table on the page.
pub const MAX_ROWS_ENV: &str = "CRIME_DASHBOARD_MAX_ROWS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_TABLE_ROWS: usize = 500;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured source could not be loaded.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// An interactive prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Process-wide server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Id of the source definition to serve.
    pub source_id: String,
    /// Maximum incident rows rendered in the page table.
    pub max_table_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            source_id: DEFAULT_SOURCE_ID.to_string(),
            max_table_rows: DEFAULT_MAX_TABLE_ROWS,
        }
    }
}

impl ServerConfig {
    /// Reads settings from the process environment, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup(PORT_ENV).and_then(|p| {
            p.parse::<u16>()
                .inspect_err(|e| log::warn!("Ignoring {PORT_ENV}={p}: {e}"))
                .ok()
        });
        let max_table_rows = lookup(MAX_ROWS_ENV).and_then(|n| {
            n.parse::<usize>()
                .inspect_err(|e| log::warn!("Ignoring {MAX_ROWS_ENV}={n}: {e}"))
                .ok()
        });

        Self {
            bind_addr: lookup(BIND_ADDR_ENV).unwrap_or(defaults.bind_addr),
            port: port.unwrap_or(defaults.port),
            source_id: lookup(SOURCE_ENV).unwrap_or(defaults.source_id),
            max_table_rows: max_table_rows.unwrap_or(defaults.max_table_rows),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Where incidents and the boundary overlay come from.
    pub source: Arc<dyn CrimeSource>,
    /// Map framing, overlay label and style.
    pub definition: SourceDefinition,
    /// Maximum incident rows rendered in the page table.
    pub max_table_rows: usize,
}

impl AppState {
    /// Builds state for a registered source definition.
    #[must_use]
    pub fn for_definition(definition: SourceDefinition, max_table_rows: usize) -> Self {
        Self {
            source: Arc::new(ConfiguredSource::new(definition.clone())),
            definition,
            max_table_rows,
        }
    }
}

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summary", web::get().to(handlers::summary)),
    );
}

/// Starts the crime dashboard server.
///
/// Resolves the configured source definition and runs the Actix-Web HTTP
/// server until it is stopped. The caller provides the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Source`] if the source id is not registered and
/// [`ServerError::Io`] if the server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let definition = find_source(&config.source_id)?;
    log::info!(
        "Serving {} ({} rows from {})",
        definition.name,
        definition.dataset.row_limit,
        definition.dataset.api_url
    );

    let state = web::Data::new(AppState::for_definition(
        definition,
        config.max_table_rows,
    ));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.source_id, "chicago");
        assert_eq!(config.max_table_rows, 500);
    }

    #[test]
    fn reads_environment_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            (BIND_ADDR_ENV, "0.0.0.0"),
            (PORT_ENV, "3000"),
            (SOURCE_ENV, "elsewhere"),
            (MAX_ROWS_ENV, "25"),
        ]));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.source_id, "elsewhere");
        assert_eq!(config.max_table_rows, 25);
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[(PORT_ENV, "eighty"), (MAX_ROWS_ENV, "-1")]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_table_rows, 500);
    }

    #[test]
    fn state_for_default_source() {
        let definition = find_source(DEFAULT_SOURCE_ID).unwrap();
        let state = AppState::for_definition(definition, 10);
        assert_eq!(state.source.id(), "chicago");
        assert_eq!(state.max_table_rows, 10);
    }
}
