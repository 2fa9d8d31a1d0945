//! prpulse CLI - sync pull request activity from GitHub into a database.

mod commands;
mod config;
mod progress;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "prpulse")]
#[command(version)]
#[command(about = "Incremental pull request activity sync")]
#[command(
    long_about = "prpulse mirrors a GitHub repository's pull requests, reviews and comments \
into a local database. Each run picks up where the previous one stopped."
)]
#[command(after_long_help = r#"EXAMPLES
    Sync the default repository:
        $ prpulse sync

    Sync a specific repository without fetching sizes:
        $ prpulse sync --owner acme --name widgets --no-details

    Fill in sizes for pull requests saved without them:
        $ prpulse backfill-sizes

CONFIGURATION
    prpulse reads configuration from:
      1. ~/.config/prpulse/config.toml (or $XDG_CONFIG_HOME/prpulse/config.toml)
      2. ./prpulse.toml
      3. Environment variables (PRPULSE_ prefix, e.g. PRPULSE_SYNC__REQUEST_DELAY_MS)
      4. .env.local and .env files in the current directory

ENVIRONMENT VARIABLES
    DATABASE_URL          Database connection string (default: ~/.local/state/prpulse/prpulse.db)
    GITHUB_API_TOKEN      GitHub personal access token
    DEFAULT_REPO_OWNER    Repository owner to sync
    DEFAULT_REPO_NAME     Repository name to sync
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync pull requests, reviews and comments of a repository
    #[cfg(feature = "github")]
    Sync(SyncArgs),
    /// Fetch line counts for pull requests stored without a size
    #[cfg(feature = "github")]
    BackfillSizes,
    /// Count review comments per category
    Categories,
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Debug, Clone, clap::Args)]
struct SyncArgs {
    /// Repository owner (default from config or DEFAULT_REPO_OWNER)
    #[arg(short, long)]
    owner: Option<String>,

    /// Repository name (default from config or DEFAULT_REPO_NAME)
    #[arg(short, long)]
    name: Option<String>,

    /// Don't fetch pull requests individually to learn their size
    #[arg(long)]
    no_details: bool,

    /// Pause between API requests in milliseconds (default from config or 100)
    #[arg(short = 'd', long)]
    request_delay_ms: Option<u64>,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("prpulse=info,prpulse_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = config.database_url()?;
    ensure_sqlite_dir(&database_url)?;

    let db = match command {
        Commands::Migrate { .. } => prpulse::connect(&database_url).await?,
        _ => prpulse::connect_and_migrate(&database_url).await?,
    };

    let result = dispatch(command, config, &db).await;

    if let Err(e) = db.close().await {
        tracing::warn!(error = %e, "Failed to close database connection");
    }

    result
}

async fn dispatch(
    command: Commands,
    config: &Config,
    db: &DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        #[cfg(feature = "github")]
        Commands::Sync(args) => commands::sync::handle_sync(args, config, db).await,
        #[cfg(feature = "github")]
        Commands::BackfillSizes => commands::backfill::handle_backfill(config, db).await,
        Commands::Categories => commands::categories::handle_categories(db).await,
        Commands::Migrate { action } => commands::migrate::handle_migrate(action, db).await,
    }
}

/// Ensure the database directory exists for SQLite.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    // Strip query parameters (e.g., ?mode=rwc) before path operations
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if db_path.is_relative() && !db_path.as_os_str().is_empty() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory. \
             Consider using an absolute path.",
            db_path.display()
        );
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[cfg(feature = "github")]
    #[test]
    fn test_parse_sync_flags() {
        let cli = Cli::try_parse_from([
            "prpulse",
            "sync",
            "--owner",
            "acme",
            "--name",
            "widgets",
            "--no-details",
            "-d",
            "0",
        ])
        .unwrap();

        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.owner.as_deref(), Some("acme"));
                assert_eq!(args.name.as_deref(), Some("widgets"));
                assert!(args.no_details);
                assert_eq!(args.request_delay_ms, Some(0));
            }
            _ => panic!("expected sync command"),
        }
    }

    #[test]
    fn test_parse_migrate_fresh() {
        let cli = Cli::try_parse_from(["prpulse", "migrate", "fresh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate {
                action: MigrateAction::Fresh
            }
        ));
    }

    #[test]
    fn test_ensure_sqlite_dir_ignores_other_schemes() {
        assert!(ensure_sqlite_dir("postgres://localhost/prpulse").is_ok());
        assert!(ensure_sqlite_dir("sqlite::memory:").is_ok());
    }
}
