//! Account lockout administration.

use clap::{Args, Subcommand};

use campus_auth::{LockoutPolicy, LockoutState};
use campus_core::config::AppConfig;
use campus_core::error::AppError;

use crate::output::{self, Field, OutputFormat};

/// Arguments for lockout commands
#[derive(Debug, Args)]
pub struct LockoutArgs {
    /// Lockout subcommand
    #[command(subcommand)]
    pub command: LockoutCommand,
}

/// Lockout subcommands
#[derive(Debug, Subcommand)]
pub enum LockoutCommand {
    /// Show failed attempts and lock state for a principal
    Status {
        /// Principal id
        principal_id: i64,
    },
    /// Lift a lock and clear the failure counter
    Unlock {
        /// Principal id
        principal_id: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Execute lockout commands
pub async fn execute(
    args: &LockoutArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::connect_store(config).await?;
    let policy = LockoutPolicy::new(&config.auth, store);

    match &args.command {
        LockoutCommand::Status { principal_id } => {
            let rows = match policy.status(*principal_id).await? {
                LockoutState::Unlocked { attempts } => vec![
                    Field::new("state", "unlocked"),
                    Field::new(
                        "failed_attempts",
                        format!("{attempts}/{}", policy.max_attempts()),
                    ),
                ],
                LockoutState::Locked { remaining } => vec![
                    Field::new("state", "locked"),
                    Field::new("remaining_ms", remaining.as_millis()),
                ],
            };
            output::print_list(&rows, format);
        }
        LockoutCommand::Unlock {
            principal_id,
            force,
        } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Unlock principal {principal_id}?"))
                    .default(false)
                    .interact()
                    .map_err(super::input_error)?;
                if !confirm {
                    output::print_warning("Cancelled.");
                    return Ok(());
                }
            }
            policy.unlock(*principal_id).await?;
            output::print_success(&format!("Principal {principal_id} unlocked"));
        }
    }
    Ok(())
}
