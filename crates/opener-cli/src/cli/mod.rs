use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::GlobalFlags;
pub use root_commands::Commands;

/// Top-level CLI parser for the `issue-opener` binary.
#[derive(Debug, Parser)]
#[command(
    name = "issue-opener",
    version,
    about = "Open tracker issues for failing policy evaluations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./opener.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            config: self.config.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_port_override() {
        let cli = Cli::try_parse_from(["issue-opener", "serve", "--port", "9000"])
            .expect("cli should parse");
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "issue-opener",
            "replay",
            "event.json",
            "--config",
            "deploy/opener.toml",
            "--verbose",
        ])
        .expect("cli should parse");

        let flags = cli.global_flags();
        assert!(flags.verbose);
        assert!(!flags.quiet);
        assert_eq!(flags.config.as_deref(), Some(Path::new("deploy/opener.toml")));
        match cli.command {
            Commands::Replay(args) => assert_eq!(args.file, Path::new("event.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn replay_requires_file() {
        assert!(Cli::try_parse_from(["issue-opener", "replay"]).is_err());
    }

    #[test]
    fn schema_takes_no_arguments() {
        let cli = Cli::try_parse_from(["issue-opener", "-q", "schema"]).expect("cli should parse");
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn port_must_be_numeric() {
        assert!(Cli::try_parse_from(["issue-opener", "serve", "--port", "http"]).is_err());
    }
}
