//! Command-line interface for carview.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// carview - browse cars and share reviews
#[derive(Parser)]
#[command(name = "carview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    Serve,

    /// Load car records from a JSON array file
    ImportCars {
        /// Path to the JSON file
        path: PathBuf,
    },

    /// Grant or revoke admin rights
    SetAdmin {
        /// Account to change
        username: String,
        /// Remove admin rights instead of granting them
        #[arg(long)]
        revoke: bool,
    },

    /// Create default config file
    #[command(alias = "init")]
    InitConfig,
}

pub use commands::*;
