use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Generate Markdown documentation based on file processing rules"
)]
pub struct Cli {
    /// Path to the configuration file (YAML, or TOML when it ends in .toml)
    #[arg(long, default_value = "prepare_config.yaml")]
    pub config: PathBuf,

    /// Directory to save the generated Markdown files
    #[arg(
        long = "output_dir",
        visible_alias = "output-dir",
        default_value = "output_docs"
    )]
    pub output_dir: PathBuf,

    /// Log output-stage failures and continue with the remaining outputs
    #[arg(long)]
    pub keep_going: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}
