//! hrdesk CLI - employee lifecycle records from the terminal

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hrdesk::config::{self, Settings};
use hrdesk::output::{emit_error, OutputMode};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "hrdesk")]
#[command(version)]
#[command(about = "Employee lifecycle store - onboarding, offboarding and the records in between")]
#[command(long_about = r#"
hrdesk keeps employee lifecycle records in a single SQLite file:
  • Dashboard of joiners and leavers in a date window
  • Browse any table and its expected upload columns
  • All-or-nothing CSV/JSON uploads
  • A JSON HTTP API behind a login session

Example usage:
  hrdesk init
  hrdesk dashboard --days 14
  hrdesk upload employee_assets ./assets.csv
  hrdesk serve --port 8501
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON envelopes instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (default: ./hrdesk.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and seed demo data on first run
    Init {
        /// Mark the database initialized without demo rows
        #[arg(long)]
        no_seed: bool,

        /// Drop every table first
        #[arg(long)]
        reset: bool,
    },

    /// Joiners and leavers in a date window
    Dashboard {
        /// Window start (YYYY-MM-DD, default today)
        #[arg(short, long)]
        from: Option<NaiveDate>,

        /// Days after the start date to include
        #[arg(long)]
        days: Option<u32>,
    },

    /// List user tables with row counts
    Tables,

    /// Print rows from a table
    Show {
        table: String,

        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Columns an upload into a table must carry
    Columns { table: String },

    /// Bulk insert a CSV or JSON file into a table
    Upload { table: String, file: PathBuf },

    /// List workflow tasks
    Workflow {
        /// Only tasks with this status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Start the HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default config file
    Config {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Dashboard { .. } => "dashboard",
            Commands::Tables => "tables",
            Commands::Show { .. } => "show",
            Commands::Columns { .. } => "columns",
            Commands::Upload { .. } => "upload",
            Commands::Workflow { .. } => "workflow",
            Commands::Serve { .. } => "serve",
            Commands::Config { .. } => "config",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let mode = OutputMode::from_flag(cli.json);

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let command = cli.command.name();
    if let Err(err) = run(cli, mode) {
        if mode.is_human() {
            hrdesk::ui::error(&format!("{:#}", err));
        } else {
            emit_error(command, &err);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let Cli { config, database, command, .. } = cli;
    let config_path = config.unwrap_or_else(config::default_config_path);
    let settings = || load_settings(&config_path, database.as_deref());

    match command {
        Commands::Init { no_seed, reset } => commands::run_init(mode, &settings()?, no_seed, reset),
        Commands::Dashboard { from, days } => commands::run_dashboard(mode, &settings()?, from, days),
        Commands::Tables => commands::run_tables(mode, &settings()?),
        Commands::Show { table, limit } => commands::run_show(mode, &settings()?, &table, limit),
        Commands::Columns { table } => commands::run_columns(mode, &settings()?, &table),
        Commands::Upload { table, file } => commands::run_upload(mode, &settings()?, &table, &file),
        Commands::Workflow { status } => commands::run_workflow(mode, &settings()?, status.as_deref()),
        Commands::Serve { port } => commands::run_serve(settings()?, port),
        Commands::Config { force } => commands::run_config(mode, &config_path, force),
    }
}

/// Config file values with CLI overrides applied
fn load_settings(config_path: &Path, database: Option<&Path>) -> anyhow::Result<Settings> {
    let file_config = config::load_config(Some(config_path))?;
    let mut settings = Settings::resolve(file_config.as_ref());
    if let Some(database) = database {
        settings.database = database.to_path_buf();
    }
    tracing::debug!("Using database {}", settings.database.display());
    Ok(settings)
}
