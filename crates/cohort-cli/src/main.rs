use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "cohort",
    about = "Cohort: form mentoring teams from applicant availability",
    version,
    propagate_version = true,
)]
struct Cli {
    /// State database path
    #[arg(long, global = true, default_value = "cohort.redb")]
    db: PathBuf,
    /// Formation settings (cohort.toml). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load sessions, teams, memberships, availability, survey responses
    /// and project preferences from a JSON dataset
    Seed {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Place applicants onto teams and record them as djangonauts
    Allocate {
        #[arg(short, long)]
        session: u64,
        /// Compute the allocation without writing memberships
        #[arg(long)]
        dry_run: bool,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Per-team overlap report for a session
    Report {
        #[arg(short, long)]
        session: u64,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Shared availability of a group of users
    Overlap {
        /// Comma-separated user ids, e.g. 1,2,3
        #[arg(short, long, value_delimiter = ',', required = true)]
        users: Vec<u64>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Best one-hour meeting windows for a session's members
    Windows {
        #[arg(short, long)]
        session: u64,
        #[arg(short, long, default_value_t = 5)]
        top: usize,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,cohort=debug"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Seed { file } => commands::seed::seed(&cli.db, &file),
        Commands::Allocate {
            session,
            dry_run,
            format,
        } => commands::allocate::allocate(&cli.db, &config, session, dry_run, format),
        Commands::Report { session, format } => {
            commands::report::report(&cli.db, &config, session, format)
        }
        Commands::Overlap { users, format } => commands::overlap::overlap(&cli.db, &users, format),
        Commands::Windows {
            session,
            top,
            format,
        } => commands::windows::windows(&cli.db, session, top, format),
    }
}
