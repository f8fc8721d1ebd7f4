//! CLI module - Command-line interface for Formarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Formarr - AI form builder
/// Describe a form in plain language and share it with a link
#[derive(Parser)]
#[command(name = "formarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server with the background scheduler
    #[command(alias = "-d", alias = "--daemon")]
    Daemon,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Delete expired cache entries now
    Cleanup,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Show database and configuration status
    Status,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new account
    Add {
        /// Email address for the account
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// List registered accounts
    #[command(alias = "ls")]
    List,
}

pub use commands::*;
