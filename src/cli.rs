use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// UKCP climate projection data selection.
#[derive(Parser)]
#[command(
    name = "ukcp",
    version,
    about = "Select, filter and derive anomalies from UKCP climate projections"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run a request and summarise the selected data.
    Extract(ExtractArgs),
    /// Print the files a request reads.
    Files(FilesArgs),
    /// Validate a request and print the normalised criteria.
    Validate(ValidateArgs),
}

/// Config file and dataset root overrides shared by every subcommand.
#[derive(clap::Args, Debug)]
pub struct DataArgs {
    /// Path to TOML configuration file [default: ukcp.toml if present].
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the projection data root from config.
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Override the observation data root from config.
    #[arg(long)]
    pub obs_root: Option<PathBuf>,
}

/// Arguments for the `extract` subcommand.
#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Request TOML file.
    pub request: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,

    /// Override the random sampling seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Write a JSON summary of the output to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Arguments for the `files` subcommand.
#[derive(clap::Args)]
pub struct FilesArgs {
    /// Request TOML file.
    pub request: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,

    /// Resolve the baseline files of this baseline id instead.
    #[arg(short, long, conflicts_with = "overlay")]
    pub baseline: Option<String>,

    /// Resolve the probability-level overlay files instead.
    #[arg(long)]
    pub overlay: bool,

    /// Print the grouped file set as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` subcommand.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Request TOML file.
    pub request: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,
}
