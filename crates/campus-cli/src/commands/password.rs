//! Credential hashing and policy checks.

use clap::{Args, Subcommand};

use campus_auth::{PasswordHasher, PasswordValidator};
use campus_core::config::AppConfig;
use campus_core::error::AppError;

use crate::output;

/// Arguments for password commands
#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Password subcommand
    #[command(subcommand)]
    pub command: PasswordCommand,
}

/// Password subcommands
#[derive(Debug, Subcommand)]
pub enum PasswordCommand {
    /// Prompt for a password and print its Argon2id hash
    Hash {
        /// Skip the policy check
        #[arg(long)]
        skip_policy: bool,
    },
    /// Prompt for a password and check it against the policy
    Check,
}

/// Execute password commands
pub fn execute(args: &PasswordArgs, config: &AppConfig) -> Result<(), AppError> {
    let validator = PasswordValidator::new(&config.auth);

    match &args.command {
        PasswordCommand::Hash { skip_policy } => {
            let password = prompt(true)?;
            if !skip_policy {
                validator.validate(&password)?;
            }
            println!("{}", PasswordHasher::new().hash_password(&password)?);
        }
        PasswordCommand::Check => {
            let password = prompt(false)?;
            validator.validate(&password)?;
            output::print_success("Password meets the policy");
        }
    }
    Ok(())
}

/// Read a password without echo.
pub fn prompt(confirm: bool) -> Result<String, AppError> {
    let mut input = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input.interact().map_err(super::input_error)
}
