//! Configuration file support for prpulse.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Legacy environment variables (`GITHUB_API_TOKEN`, `DEFAULT_REPO_OWNER`,
//!    `DEFAULT_REPO_NAME`, `DATABASE_URL`)
//! 3. Environment variables prefixed with `PRPULSE_`, sections separated by a
//!    double underscore (e.g. `PRPULSE_SYNC__REQUEST_DELAY_MS`)
//! 4. Config file (./prpulse.toml, then ~/.config/prpulse/config.toml)
//! 5. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/prpulse/prpulse.db` on Linux
//! (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://localhost/prpulse"  # optional, SQLite in the state dir by default
//!
//! [github]
//! token = "ghp_..."  # or GITHUB_API_TOKEN
//! owner = "acme"
//! name = "widgets"
//!
//! [sync]
//! request_delay_ms = 100
//! retry_attempts = 3
//! retry_delay_ms = 1000
//! fetch_details = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, ConfigBuilder as Builder, Environment, File, FileFormat};
use config::builder::DefaultState;
use directories::ProjectDirs;
use prpulse::retry::RetryPolicy;
use prpulse::sync::{
    DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_DELAY_MS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS,
    SyncOptions,
};
use serde::Deserialize;
use thiserror::Error;

/// Legacy environment variables and the settings they map to.
const LEGACY_ENV_VARS: [(&str, &str); 4] = [
    ("GITHUB_API_TOKEN", "github.token"),
    ("DEFAULT_REPO_OWNER", "github.owner"),
    ("DEFAULT_REPO_NAME", "github.name"),
    ("DATABASE_URL", "database.url"),
];

/// Settings that are required for a command but missing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GitHub token not configured. Set GITHUB_API_TOKEN or [github] token in the config file.")]
    MissingToken,

    #[error(
        "Repository not configured. Pass --owner/--name or set DEFAULT_REPO_OWNER and DEFAULT_REPO_NAME."
    )]
    MissingRepository,

    #[error("Could not determine a database URL. Set DATABASE_URL.")]
    MissingDatabaseUrl,
}

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub sync: SyncConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    pub token: Option<String>,
    /// Default repository owner.
    pub owner: Option<String>,
    /// Default repository name.
    pub name: Option<String>,
}

/// Sync tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Pause between remote requests.
    pub request_delay_ms: u64,
    /// Attempts per remote call, including the first.
    pub retry_attempts: u32,
    /// Pause between attempts.
    pub retry_delay_ms: u64,
    /// Fetch pull requests individually when the listing lacks line counts.
    pub fetch_details: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            fetch_details: true,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/prpulse/config.toml)
    /// 3. Local config file (./prpulse.toml)
    /// 4. Environment variables with PRPULSE_ prefix
    /// 5. Legacy environment variables
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "prpulse") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("prpulse.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./prpulse.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g. PRPULSE_DATABASE__URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("PRPULSE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let builder = match with_legacy_env(builder, |key| std::env::var(key).ok()) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::warn!("Failed to apply legacy environment variables: {}", e);
                return Config::default();
            }
        };

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter creates the SQLite file if it doesn't exist.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        self.database
            .url
            .clone()
            .or_else(|| {
                Self::default_state_dir().map(|state_dir| {
                    let db_path = state_dir.join("prpulse.db");
                    format!("sqlite://{}?mode=rwc", db_path.display())
                })
            })
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Result<String, ConfigError> {
        self.github
            .token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// Resolve the repository to sync; flags win over configuration.
    pub fn repository(
        &self,
        owner: Option<String>,
        name: Option<String>,
    ) -> Result<(String, String), ConfigError> {
        let owner = owner.or_else(|| self.github.owner.clone());
        let name = name.or_else(|| self.github.name.clone());
        match (owner, name) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => Ok((owner, name)),
            _ => Err(ConfigError::MissingRepository),
        }
    }

    /// Engine options from the `[sync]` section.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            per_page: DEFAULT_PAGE_SIZE,
            request_delay: Duration::from_millis(self.sync.request_delay_ms),
            retry: RetryPolicy::new(
                self.sync.retry_attempts,
                Duration::from_millis(self.sync.retry_delay_ms),
            ),
            fetch_details: self.sync.fetch_details,
        }
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/prpulse` or `~/.local/state/prpulse`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "prpulse").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

/// Apply the legacy variables as overrides.
fn with_legacy_env<F>(
    mut builder: Builder<DefaultState>,
    lookup: F,
) -> Result<Builder<DefaultState>, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in LEGACY_ENV_VARS {
        builder = builder.set_override_option(key, lookup(var))?;
    }
    Ok(builder)
}
