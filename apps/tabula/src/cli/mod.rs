//! # Tabula CLI Module
//!
//! This module implements the CLI interface for Tabula.
//!
//! ## Available Commands
//!
//! - `page` - Render one page of the grid (default)
//! - `columns` - List the configured columns
//! - `server` - Start the HTTP server

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabula_core::TabulaError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tabula - In-memory data grid engine
///
/// Pages, sorts and aggregates a JSON dataset described by a TOML grid file.
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the grid settings (TOML)
    #[arg(short, long, global = true, default_value = "tabula.toml")]
    pub config: PathBuf,

    /// Path to the row data (JSON array, or object with rows and totalRows)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Render one page of the grid
    Page {
        /// Page to show (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Sort as "field,up" or "field,down"
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// List the configured columns
    Columns,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), TabulaError> {
    let data = cli.data.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&cli.config, data, &host, port).await,
        Some(Commands::Page { page, sort }) => cmd_page(
            &cli.config,
            data,
            json_mode,
            cli.verbose,
            page,
            sort.as_deref(),
        ),
        Some(Commands::Columns) => cmd_columns(&cli.config, json_mode),
        None => {
            // No subcommand - render the configured page
            cmd_page(&cli.config, data, json_mode, cli.verbose, None, None)
        }
    }
}
