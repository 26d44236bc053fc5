use std::path::PathBuf;

/// Global flags available before or after subcommands.
#[derive(Clone, Debug, Default)]
pub struct GlobalFlags {
    pub config: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}
