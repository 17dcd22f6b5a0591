//! Command-line interface definition for Hoos Who
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, the HTTP
//! server, and the company directory listing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hoos Who - find classmates by career background
///
/// Ask natural-language questions about the cohort directory and get
/// answers from the Anthropic API.
#[derive(Parser, Debug, Clone)]
#[command(name = "hooswho")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the student directory CSV path
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Override the audit log path
    #[arg(long)]
    pub audit_log: Option<PathBuf>,

    /// Override the model used for answers
    #[arg(long)]
    pub model: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Hoos Who
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session in the terminal
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask about your classmates
        question: String,
    },

    /// Serve the JSON chat API over HTTP
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8080
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List the companies represented in the directory
    Directory {
        /// Only show companies containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            data: None,
            audit_log: None,
            model: None,
            command: Commands::Chat,
        }
    }
}
