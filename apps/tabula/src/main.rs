//! # Tabula - Data Grid Server
//!
//! The main binary for the Tabula grid engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) over one shared grid
//! - CLI interface for rendering pages of a dataset
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/tabula (THE BINARY)           │
//! │                                               │
//! │   ┌─────────────┐         ┌─────────────┐     │
//! │   │    CLI      │         │  HTTP API   │     │
//! │   │   (clap)    │         │   (axum)    │     │
//! │   └──────┬──────┘         └──────┬──────┘     │
//! │          └───────────┬───────────┘            │
//! │                      ▼                        │
//! │              ┌───────────────┐                │
//! │              │  tabula-core  │                │
//! │              │  (THE LOGIC)  │                │
//! │              └───────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Render page 2 sorted by price, descending
//! tabula -c grid.toml -d rows.json page --page 2 --sort price,down
//!
//! # Start the HTTP server
//! tabula -c grid.toml -d rows.json server --port 8080
//! ```

use clap::Parser;
use tabula::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose);

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the tracing subscriber.
///
/// `TABULA_LOG_FORMAT=json` enables machine-parseable output; `RUST_LOG`
/// overrides the default filter.
fn init_tracing(verbose: bool) {
    let log_format = std::env::var("TABULA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if verbose {
        "tabula=debug,tabula_core=debug,tower_http=debug"
    } else {
        "tabula=info,tabula_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print the Tabula startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┬─┬─┐
  ├─┼─┼─┤  Tabula v{}
  └─┴─┴─┘  In-memory data grid engine
"#,
        env!("CARGO_PKG_VERSION")
    );
}
