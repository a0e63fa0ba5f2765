//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::allocate::{AllocateArgs, AllocateFailure};
use commands::init::InitArgs;
use commands::list::ListArgs;
use commands::preview::PreviewArgs;
use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(name = "initials", version, about = "Allocate unique initials for employee names")]
pub struct Cli {
    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Extra YAML config merged over .initials/config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and default configuration
    Init(InitArgs),
    /// Allocate and record initials for a name
    Allocate(AllocateArgs),
    /// Show every candidate for a name without touching the database
    Preview(PreviewArgs),
    /// List allocated initials, newest first
    List(ListArgs),
    /// Serve the allocation HTTP API
    Serve(ServeArgs),
}

/// Print `err` and exit. Allocation outcomes carry their own exit codes.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let exit_code = err
        .downcast_ref::<AllocateFailure>()
        .map_or(1, AllocateFailure::exit_code);

    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
            "exit_code": exit_code,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {:#}", console::style("Error:").red().bold(), err);
    }

    std::process::exit(exit_code)
}
