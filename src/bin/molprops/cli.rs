use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "molprops",
    about = "Chunked, parallel molecular descriptor computation",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute descriptors for a SMILES library table
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Serve one chunk over stdin/stdout (process-isolation worker)
    #[command(hide = true)]
    Worker,
}

/// I/O options.
#[derive(Args)]
pub struct IoOptions {
    /// Input CSV file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file, replaced atomically
    #[arg(short, long, value_name = "FILE", default_value = "library.csv")]
    pub output: PathBuf,

    /// Output format (inferred from extension if not specified)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Also write the molecule name (row key) as the first column
    #[arg(long)]
    pub with_key: bool,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Partitioning and column options; each overrides the --config file.
#[derive(Args)]
#[command(next_help_heading = "Pipeline")]
pub struct PipelineOptions {
    /// Pipeline configuration (TOML file)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target rows per chunk [default: 3]
    #[arg(long, value_name = "N")]
    pub chunk_size: Option<usize>,

    /// Upper bound on concurrent workers [default: 4]
    #[arg(long, value_name = "N")]
    pub max_workers: Option<usize>,

    /// Worker isolation [default: process]
    #[arg(long, value_name = "MODE")]
    pub isolation: Option<Isolation>,

    /// Name of the structure column, case-insensitive [default: SMILES]
    #[arg(long, value_name = "NAME")]
    pub smiles_column: Option<String>,

    /// Name of the unique molecule name column, case-insensitive [default: "Molecule name"]
    #[arg(long, value_name = "NAME")]
    pub name_column: Option<String>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub pipeline: PipelineOptions,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values
    Csv,
    /// JSON array of row objects
    Json,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum Isolation {
    /// One OS process per chunk
    #[default]
    Process,
    /// One thread per chunk
    Thread,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["molprops", "run", "-i", "lib.csv"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.io.output, PathBuf::from("library.csv"));
        assert!(args.io.format.is_none());
        assert!(!args.io.with_key);
        assert!(args.pipeline.chunk_size.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn run_overrides_and_global_verbosity() {
        let cli = Cli::try_parse_from([
            "molprops",
            "run",
            "--chunk-size",
            "10",
            "--isolation",
            "thread",
            "--name-column",
            "ID",
            "-vv",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.pipeline.chunk_size, Some(10));
        assert!(matches!(args.pipeline.isolation, Some(Isolation::Thread)));
        assert_eq!(args.pipeline.name_column.as_deref(), Some("ID"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn worker_is_parsed() {
        let cli = Cli::try_parse_from(["molprops", "worker"]).unwrap();
        assert!(matches!(cli.command, Command::Worker));
    }
}
