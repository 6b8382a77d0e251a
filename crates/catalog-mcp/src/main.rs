//! Catalog MCP server binary
//!
//! # Usage
//!
//! ```bash
//! catalog-mcp --config catalog-mcp.toml
//! catalog-mcp --base-url https://catalog.example.com/api/catalog
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log verbosity (default: `catalog_mcp=info`)
//! - the variable named by `token_env` in the config (default
//!   `CATALOG_TOKEN`): bearer token for the catalog API
//!
//! # Protocol
//!
//! JSON-RPC 2.0 over stdio. Requests/responses go through stdout; logs
//! go to stderr to keep the protocol stream clean.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use url::Url;

use catalog_client::{HttpCatalogClient, StaticTokenProvider};
use catalog_mcp::{CatalogMcpServer, Error, ServerConfig};

/// MCP server for the software catalog
#[derive(Parser)]
#[command(name = "catalog-mcp")]
#[command(about = "MCP server for the software catalog")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog API root; overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Environment variable holding the bearer token; overrides the config
    #[arg(long)]
    token_env: Option<String>,

    /// Write the tool manifest to this path after registration
    #[arg(long)]
    export_manifest: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is reserved for the MCP protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match (&args.config, &args.base_url) {
        (Some(path), _) => ServerConfig::load(path)?,
        (None, Some(base_url)) => ServerConfig::with_base_url(base_url.clone()),
        (None, None) => {
            return Err(Box::new(Error::Config(
                "either --config or --base-url is required".to_string(),
            )) as Box<dyn std::error::Error>);
        }
    };
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(token_env) = args.token_env {
        config.token_env = token_env;
    }

    let base: Url = config
        .base_url
        .parse()
        .map_err(|e| Error::Config(format!("invalid base_url: {e}")))?;
    let token = std::env::var(&config.token_env).ok();
    if token.is_none() {
        tracing::warn!(
            var = %config.token_env,
            "no catalog token in environment; requests will be anonymous"
        );
    }

    let client = HttpCatalogClient::new(base, Arc::new(StaticTokenProvider::new(token)))?;

    tracing::info!(base_url = %config.base_url, "starting catalog-mcp server");
    let server = CatalogMcpServer::build(&config, Arc::new(client))?;

    // Manifest export is best-effort; a failed write never blocks startup.
    let manifest_path = args.export_manifest.or_else(|| config.manifest_path.clone());
    if let Some(path) = manifest_path {
        if let Err(e) = server.manifest().export(&path) {
            tracing::warn!(path = %path.display(), error = %e, "manifest export failed");
        }
    }

    server.run().await?;
    Ok(())
}
