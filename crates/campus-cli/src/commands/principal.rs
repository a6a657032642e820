//! Principal administration.

use clap::{Args, Subcommand};
use serde::Serialize;

use campus_auth::{PasswordHasher, PasswordValidator};
use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_entity::principal::{PrincipalDirectory, PrincipalView, Role};

use crate::output::{self, OutputFormat};

/// Arguments for principal commands
#[derive(Debug, Args)]
pub struct PrincipalArgs {
    /// Principal subcommand
    #[command(subcommand)]
    pub command: PrincipalCommand,
}

/// Principal subcommands
#[derive(Debug, Subcommand)]
pub enum PrincipalCommand {
    /// Create a principal, prompting for its password
    Create {
        /// Login name
        #[arg(short, long)]
        login: String,
        /// Display name (defaults to the login)
        #[arg(short, long)]
        name: Option<String>,
        /// Role: admin, teacher, accountant or viewer
        #[arg(short, long, default_value = "viewer")]
        role: Role,
        /// Contact email, stored encrypted
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Show a principal by login
    Show {
        /// Login name
        login: String,
    },
    /// Find a principal by contact email via its search hash
    FindByEmail {
        /// Email address
        email: String,
    },
    /// Set or replace a principal's contact email
    SetEmail {
        /// Principal id
        principal_id: i64,
        /// Email address
        email: String,
    },
}

/// A principal together with its decrypted contact email.
#[derive(Debug, Serialize)]
struct PrincipalDetail {
    #[serde(flatten)]
    principal: PrincipalView,
    email: Option<String>,
}

/// Execute principal commands
pub async fn execute(
    args: &PrincipalArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let directory = super::connect_directory(config).await?;

    match &args.command {
        PrincipalCommand::Create {
            login,
            name,
            role,
            email,
        } => {
            let password = super::password::prompt(true)?;
            PasswordValidator::new(&config.auth).validate(&password)?;
            let hash = PasswordHasher::new().hash_password(&password)?;

            let display_name = name.as_deref().unwrap_or(login);
            let id = directory
                .create(login, &hash, display_name, *role, email.as_deref())
                .await?;
            output::print_success(&format!("Principal '{login}' created (id: {id})"));
        }
        PrincipalCommand::Show { login } => {
            let principal = directory
                .find_by_login(login)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Principal '{login}' not found")))?;
            let detail = PrincipalDetail {
                principal: PrincipalView::from(&principal),
                email: directory.email(principal.id).await?,
            };
            output::print_item(&detail, format);
        }
        PrincipalCommand::FindByEmail { email } => match directory.find_by_email(email).await? {
            Some(principal) => output::print_item(&PrincipalView::from(&principal), format),
            None => output::print_warning("No principal with that email"),
        },
        PrincipalCommand::SetEmail {
            principal_id,
            email,
        } => {
            directory.set_email(*principal_id, email).await?;
            output::print_success(&format!("Email updated for principal {principal_id}"));
        }
    }
    Ok(())
}
