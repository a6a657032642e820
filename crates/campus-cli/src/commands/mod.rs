//! CLI command definitions and dispatch.

pub mod config;
pub mod crypto;
pub mod lockout;
pub mod migrate;
pub mod password;
pub mod principal;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use campus_cache::StoreManager;
use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_crypto::FieldCipher;
use campus_database::{DatabasePool, PgPrincipalDirectory};

use crate::output::OutputFormat;

/// Campus: authentication and field encryption administration
#[derive(Debug, Parser)]
#[command(name = "campus-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file; overrides the environment overlay
    #[arg(short, long)]
    pub config: Option<String>,

    /// Environment overlay loaded from `config/{env}.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configuration checks
    Config(config::ConfigArgs),
    /// Field encryption helpers
    Crypto(crypto::CryptoArgs),
    /// Token inspection
    Token(token::TokenArgs),
    /// Account lockout administration
    Lockout(lockout::LockoutArgs),
    /// Credential hashing and policy checks
    Password(password::PasswordArgs),
    /// Principal administration
    Principal(principal::PrincipalArgs),
    /// Database migrations
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Load configuration from `--config` or the environment overlay.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        match &self.config {
            Some(path) => AppConfig::load_from(path),
            None => AppConfig::load(&self.env),
        }
    }

    /// Execute the selected command.
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, config, self.format).await,
            Commands::Crypto(args) => crypto::execute(args, config, self.format),
            Commands::Token(args) => token::execute(args, config, self.format),
            Commands::Lockout(args) => lockout::execute(args, config, self.format).await,
            Commands::Password(args) => password::execute(args, config),
            Commands::Principal(args) => principal::execute(args, config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, config).await,
        }
    }
}

/// Helper: connect the configured security store.
pub async fn connect_store(config: &AppConfig) -> Result<Arc<StoreManager>, AppError> {
    Ok(Arc::new(StoreManager::new(&config.store).await?))
}

/// Helper: connect the database and wrap it in the principal directory.
pub async fn connect_directory(config: &AppConfig) -> Result<PgPrincipalDirectory, AppError> {
    let cipher = FieldCipher::from_config(&config.crypto)?;
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(PgPrincipalDirectory::new(pool.pool().clone(), cipher))
}

/// Helper: map a prompt failure.
pub fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
