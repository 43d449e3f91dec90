pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "glowmatch",
    about = "Glowmatch operator CLI",
    long_about = "Run matching passes over treatment cases, inspect the concern catalog, generate case reports, and validate runtime readiness.",
    after_help = "Examples:\n  glowmatch match --cases export.json --concern restore-volume-definition --age-range 40-49\n  glowmatch report --cases export.json --format markdown\n  glowmatch doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "match", about = "Run a matching pass and print ranked treatment groups")]
    Match(MatchArgs),
    #[command(about = "List the built-in concern categories and their keyword tables")]
    Catalog {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Generate a demographic coverage report over a case export")]
    Report(ReportArgs),
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
    #[command(about = "Validate config, credential readiness, and Airtable connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, clap::Args)]
pub struct MatchArgs {
    #[arg(long, help = "Path to a saved JSON case export")]
    pub cases: Option<PathBuf>,
    #[arg(long, conflicts_with = "cases", help = "Fetch cases from the configured Airtable base")]
    pub remote: bool,
    #[arg(long = "concern", help = "Concern category id (repeat up to 3 times)")]
    pub concerns: Vec<String>,
    #[arg(long = "area", help = "Body/face area (repeat up to 3 times)")]
    pub areas: Vec<String>,
    #[arg(long, help = "Age range bucket: 18-29 | 30-39 | 40-49 | 50-59 | 60+")]
    pub age_range: Option<String>,
    #[arg(long, help = "Fitzpatrick skin type: I..VI")]
    pub skin_type: Option<String>,
    #[arg(long, help = "Skin tone: fair | light | medium | olive | brown | dark")]
    pub skin_tone: Option<String>,
    #[arg(long, help = "Ethnic background")]
    pub ethnicity: Option<String>,
    #[arg(long, help = "Emit machine-readable JSON output")]
    pub json: bool,
}

#[derive(Debug, clap::Args)]
pub struct ReportArgs {
    #[arg(long, help = "Path to a saved JSON case export")]
    pub cases: PathBuf,
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Csv => "csv",
        })
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let run_id = uuid::Uuid::new_v4();
    tracing::debug!(%run_id, "cli invocation started");

    let result = match cli.command {
        Command::Match(args) => commands::match_cmd::run(&args),
        Command::Catalog { json } => {
            CommandResult { exit_code: 0, output: commands::catalog::run(json) }
        }
        Command::Report(args) => commands::report::run(&args),
        Command::Config => CommandResult { exit_code: 0, output: commands::config::run() },
        Command::Doctor { json } => {
            CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

// Command output goes to stdout; diagnostics stay on stderr so JSON output
// remains machine-readable.
fn init_logging() {
    use glowmatch_core::config::{AppConfig, LoadOptions, LogFormat};
    use tracing::Level;

    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .pretty()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
    }
}
