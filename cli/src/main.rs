//! ISMS CLI
//!
//! Command-line interface for the ISO 27001 compliance engine.
//!
//! # Usage
//!
//! ```bash
//! isms init
//! isms controls list --category technological --status "Non conforme"
//! isms controls evaluate 42 "Largement conforme" --comment "MFA en cours"
//! isms stats --format json
//! isms scan
//! isms report --output rapport.csv --csv --with-scan
//! isms documents add --title "PSSI" --version 1.0 --author RSSI --from-file pssi.md
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "isms")]
#[command(author = "Sécurité 360")]
#[command(version)]
#[command(about = "ISO 27001 compliance tracking", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "ISMS_DB")]
    db: Option<PathBuf>,

    /// Output format
    #[arg(long, short, env = "ISMS_FORMAT")]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short, env = "ISMS_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and load the Annex-A catalogue
    Init,
    /// Browse and evaluate controls
    Controls {
        #[command(subcommand)]
        action: ControlCommands,
    },
    /// Conformity counts and weighted rate
    Stats,
    /// Conformity share per category
    Breakdown,
    /// Controls below "largely conforming", by priority
    Gaps,
    /// Probe this host and score the ISO 27001 domains
    Scan {
        /// Per-signal timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Write a compliance report to a file
    Report {
        #[arg(long, short)]
        output: PathBuf,
        /// CSV instead of JSON
        #[arg(long, conflicts_with = "json")]
        csv: bool,
        #[arg(long)]
        json: bool,
        /// Include a fresh signal scan
        #[arg(long)]
        with_scan: bool,
    },
    /// Manage audits
    Audits {
        #[command(subcommand)]
        action: AuditCommands,
    },
    /// Manage security directives
    Directives {
        #[command(subcommand)]
        action: DirectiveCommands,
    },
    /// Versioned policy documents
    Documents {
        #[command(subcommand)]
        action: DocumentCommands,
    },
    /// Evaluation journal
    Journal {
        #[command(subcommand)]
        action: JournalCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ControlCommands {
    /// List controls
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive text over code, title and comment
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one control with its guidance
    Show { id: i64 },
    /// Record a new status for a control
    Evaluate {
        id: i64,
        /// Status key or label, e.g. "conforming" or "Conforme"
        status: String,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        evidence: Option<String>,
        #[arg(long, env = "ISMS_ACTOR")]
        actor: Option<String>,
    },
}

#[derive(Subcommand)]
enum AuditCommands {
    /// Record an audit
    Add {
        #[arg(long)]
        title: String,
        /// Audit date, YYYY-MM-DD
        #[arg(long)]
        date: chrono::NaiveDate,
        #[arg(long)]
        auditor: String,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        score: Option<u8>,
        #[arg(long)]
        comments: Option<String>,
    },
    /// List audits, most recent first
    List,
    /// Delete an audit
    Delete { id: i64 },
    /// Score summary and trend
    History,
}

#[derive(Subcommand)]
enum DirectiveCommands {
    /// Record a directive
    Add {
        #[arg(long)]
        title: String,
        /// technical, organisational, procedural or policy
        #[arg(long)]
        kind: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        effectiveness: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// List directives, newest first
    List,
    /// Delete a directive
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// Record a document
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "Politique")]
        category: String,
        #[arg(long)]
        version: String,
        #[arg(long)]
        author: String,
        #[arg(long, conflicts_with = "from_file")]
        content: Option<String>,
        /// Read the content from a text file
        #[arg(long)]
        from_file: Option<PathBuf>,
        /// Path of an attached PDF or office file
        #[arg(long)]
        attachment: Option<String>,
    },
    /// List documents, newest first
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one document with its content
    Show { id: i64 },
    /// Replace the content under a new version
    Revise {
        id: i64,
        #[arg(long)]
        version: String,
        #[arg(long, conflicts_with = "from_file")]
        content: Option<String>,
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum JournalCommands {
    /// List journal entries
    List,
    /// Re-walk the hash chain
    Verify,
    /// Export the journal
    Export {
        /// CSV instead of JSON
        #[arg(long)]
        csv: bool,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::Config::load(cli.profile.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli, config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: config::Config) -> anyhow::Result<()> {
    let profile = cli.profile.as_deref();
    let format = cli
        .format
        .or(config.default_format)
        .unwrap_or(output::OutputFormat::Table);

    let command = match cli.command {
        Commands::Config { action } => {
            return commands::config::handle(action, &config, profile, format);
        }
        other => other,
    };

    let db = match cli.db {
        Some(path) => path,
        None => config.database_path()?,
    };
    let engine = commands::open_engine(&db, &config.engine)?;
    tracing::debug!("Using database {}", db.display());

    match command {
        Commands::Init => commands::controls::init(&engine, &db),
        Commands::Controls { action } => {
            commands::controls::handle(action, &engine, format, config.actor.as_deref())
        }
        Commands::Stats => commands::overview::stats(&engine, format),
        Commands::Breakdown => commands::overview::breakdown(&engine, format),
        Commands::Gaps => commands::overview::gaps(&engine, format),
        Commands::Scan { timeout } => {
            commands::scan::handle(&engine, &config.engine, timeout, format).await
        }
        Commands::Report {
            output,
            csv,
            json: _,
            with_scan,
        } => commands::report::handle(&engine, &config.engine, &output, csv, with_scan).await,
        Commands::Audits { action } => commands::audits::handle(action, &engine, format),
        Commands::Directives { action } => commands::directives::handle(action, &engine, format),
        Commands::Documents { action } => commands::documents::handle(action, &engine, format),
        Commands::Journal { action } => commands::journal::handle(action, &engine, format),
        Commands::Config { .. } => Ok(()),
    }
}
