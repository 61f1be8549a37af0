use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rpa",
    about = "Save and check reward pool interval artifacts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the rewards and performance files for an interval
    Save(SaveArgs),
    /// Print the single-file-directory CID of a file
    Cid(CidArgs),
    /// Check a rewards file against its compressed performance file
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct SaveArgs {
    /// Rewards tree JSON produced by tree generation
    #[arg(long)]
    pub rewards: PathBuf,
    /// Minipool performance JSON for the same interval
    #[arg(long)]
    pub performance: PathBuf,
    /// Also write compressed copies and embed the performance CID
    #[arg(long)]
    pub trusted: bool,
    #[arg(long, default_value = "rpa.toml")]
    pub config: PathBuf,
    /// Overrides `output_dir` from the config file
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Overrides `network` from the config file
    #[arg(long)]
    pub network: Option<String>,
}

#[derive(Args)]
pub struct CidArgs {
    pub file: PathBuf,
    /// Directory entry name; defaults to the file's own name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Plain rewards file; its performance file is looked up beside it
    pub rewards: PathBuf,
}
