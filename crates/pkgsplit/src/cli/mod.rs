pub mod classify;
pub mod patterns;

use clap::{Parser, Subcommand, ValueEnum};
use pkgsplit_lib::{Config, PackageGenerator, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pkgsplit")]
#[command(about = "Split installed build files into main and subpackages", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to user patterns file")]
    pub patterns: Option<PathBuf>,

    #[arg(long, global = true, help = "Start without the built-in patterns")]
    pub no_builtins: bool,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, short = 'q', global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Files,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Classify installed files into packages")]
    Classify {
        #[arg(help = "Install root to scan", required_unless_present = "list", conflicts_with = "list")]
        root: Option<PathBuf>,

        #[arg(long, help = "Read paths from a file ('-' for stdin) instead of scanning")]
        list: Option<PathBuf>,

        #[arg(long, default_value = "package", help = "Source package name used to name outputs")]
        source: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table, help = "Output format")]
        format: OutputFormat,
    },

    #[command(about = "Show the pattern registry in match order")]
    Patterns,
}

pub fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

pub fn init_generator(patterns: Option<PathBuf>, no_builtins: bool) -> Result<PackageGenerator> {
    Config::new(patterns, !no_builtins).build_generator()
}
