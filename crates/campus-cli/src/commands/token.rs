//! Token inspection.

use chrono::DateTime;
use clap::{Args, Subcommand};

use campus_auth::TokenCodec;
use campus_core::config::AppConfig;
use campus_core::error::AppError;

use crate::output::{self, Field, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Verify a token with the configured secret and show its claims
    Inspect {
        /// Compact token
        token: String,
    },
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Inspect { token } => {
            let codec = TokenCodec::from_config(&config.auth);
            let claims = codec
                .verify(token.trim())
                .map_err(|e| AppError::authentication(format!("Token rejected: {e}")))?;

            let rows = vec![
                Field::new("subject", &claims.sub),
                Field::new(
                    "principal_id",
                    claims.uid.map_or_else(|| "-".to_string(), |id| id.to_string()),
                ),
                Field::new("type", format!("{:?}", claims.token_type).to_lowercase()),
                Field::new("issuer", &claims.iss),
                Field::new("issued_at", timestamp(claims.iat)),
                Field::new("expires_at", timestamp(claims.exp)),
                Field::new("remaining_ms", claims.remaining().as_millis()),
                Field::new("authorities", claims.authorities.join(", ")),
                Field::new("jti", &claims.jti),
            ];
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

fn timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}
