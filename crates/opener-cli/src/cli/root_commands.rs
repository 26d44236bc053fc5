use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Receive policy-changed CloudEvents over HTTP and open issues.
    Serve(ServeArgs),
    /// Dispatch one structured-mode CloudEvent read from a file.
    Replay(ReplayArgs),
    /// Print the JSON Schema of the policy-changed payload.
    Schema,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides `receiver.port`).
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct ReplayArgs {
    /// Path to a JSON CloudEvent (`type`, `data` or `data_base64`).
    pub file: PathBuf,
}
