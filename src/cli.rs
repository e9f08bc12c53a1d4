use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Rusty Reclaim - Measure how much space cleanup rules would reclaim
#[derive(Parser, Debug)]
#[command(name = "rusty-reclaim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List cleaners whose targets are installed on this host
    Rules(RulesArgs),

    /// Measure reclaimable space for the selected cleaner options
    Analyze(AnalyzeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Generate a man page
    Man,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// List every loaded cleaner, installed or not
    #[arg(short, long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Directory of rule files (overrides config)
    #[arg(long, value_name = "DIR", env = "RECLAIM_RULES_DIR")]
    pub rules_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Selections as CLEANER:OPTION, or CLEANER for all of its options
    #[arg(required = true, value_name = "SELECTION")]
    pub selections: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Abort the analysis after this many seconds (overrides config)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Worker threads (overrides config, 0 = auto)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Directory of rule files (overrides config)
    #[arg(long, value_name = "DIR", env = "RECLAIM_RULES_DIR")]
    pub rules_dir: Option<PathBuf>,

    /// Only analyse cleaners whose targets are installed
    #[arg(long)]
    pub installed: bool,
}
