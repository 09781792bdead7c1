//! CLI definitions

use clap::Parser;
use std::path::PathBuf;

/// crashnotify - supervisor crash notification listener
#[derive(Debug, Parser)]
#[command(
    name = "cn",
    about = "Sends a chat-webhook alert when a supervised process exits unexpectedly",
    version,
    after_help = "Run as a supervisor event listener subscribed to PROCESS_STATE_EXITED events.\n\
                  Diagnostics go to stderr; stdout carries the event protocol."
)]
pub struct Cli {
    /// Alert when this process transitions to EXITED unexpectedly.
    /// May be given more than once; use group:name for a process in a group.
    #[arg(short = 'p', long = "program", value_name = "NAME")]
    pub programs: Vec<String>,

    /// Alert for any child of the supervisor, overriding -p
    #[arg(short, long)]
    pub any: bool,

    /// Prefix for the alert subject line
    #[arg(short = 'o', long = "subject-prefix", value_name = "STRING")]
    pub subject_prefix: Option<String>,

    /// Robot webhook access token
    #[arg(short = 't', long = "access-token", value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// Full webhook URL, overriding the token-derived endpoint
    #[arg(long = "webhook-url", value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
