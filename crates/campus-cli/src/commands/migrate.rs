//! Database migration commands.

use clap::{Args, Subcommand};

use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_database::DatabasePool;
use campus_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            let pool = DatabasePool::connect(&config.database).await?;
            run_migrations(pool.pool()).await?;
            pool.close().await;
            output::print_success("All migrations applied.");
        }
    }
    Ok(())
}
