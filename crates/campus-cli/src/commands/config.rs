//! Configuration checks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Subcommand};

use campus_auth::jwt::codec::MIN_SECRET_BYTES;
use campus_cache::StoreManager;
use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_core::traits::SecurityStore;
use campus_crypto::FieldCipher;
use campus_database::connection::mask_password;

use crate::output::{self, Field, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Check key material and store settings
    Validate {
        /// Also connect to the security store and ping it
        #[arg(long)]
        ping: bool,
    },
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let rows = vec![
                Field::new("database.url", mask_password(&config.database.url)),
                Field::new("store.provider", &config.store.provider),
                Field::new("store.operation_timeout_ms", config.store.operation_timeout_ms),
                Field::new("auth.jwt_issuer", &config.auth.jwt_issuer),
                Field::new("auth.access_token_ttl_ms", config.auth.access_token_ttl_ms),
                Field::new("auth.refresh_token_ttl_ms", config.auth.refresh_token_ttl_ms),
                Field::new("auth.max_failed_attempts", config.auth.max_failed_attempts),
                Field::new("auth.lockout_duration_ms", config.auth.lockout_duration_ms),
                Field::new("auth.attempt_window_ms", config.auth.attempt_window_ms),
                Field::new("logging.level", &config.logging.level),
                Field::new("logging.format", &config.logging.format),
            ];
            output::print_list(&rows, format);
        }
        ConfigCommand::Validate { ping } => {
            let problems = validate(config);
            for problem in &problems {
                output::print_error(problem);
            }

            if *ping {
                let store = StoreManager::new(&config.store).await?;
                if store.health_check().await? {
                    output::print_success(&format!(
                        "Security store '{}' is reachable",
                        config.store.provider
                    ));
                }
            }

            if !problems.is_empty() {
                return Err(AppError::configuration(format!(
                    "{} configuration problem(s) found",
                    problems.len()
                )));
            }
            output::print_success("Configuration is valid");
        }
    }

    Ok(())
}

/// Every problem with the loaded configuration.
fn validate(config: &AppConfig) -> Vec<String> {
    let mut problems = Vec::new();

    match STANDARD.decode(config.auth.jwt_secret.trim()) {
        Ok(secret) if secret.len() >= MIN_SECRET_BYTES => {}
        Ok(_) => problems.push(format!(
            "auth.jwt_secret must decode to at least {MIN_SECRET_BYTES} bytes"
        )),
        Err(_) => problems.push("auth.jwt_secret is missing or not base64".to_string()),
    }

    if let Err(e) = FieldCipher::from_config(&config.crypto) {
        problems.push(format!("crypto.field_key: {e}"));
    }

    if !matches!(config.store.provider.as_str(), "memory" | "redis") {
        problems.push(format!(
            "store.provider '{}' is not one of: memory, redis",
            config.store.provider
        ));
    }
    if config.store.operation_timeout_ms == 0 {
        problems.push("store.operation_timeout_ms must be positive".to_string());
    }

    if config.auth.max_failed_attempts == 0 {
        problems.push("auth.max_failed_attempts must be positive".to_string());
    }
    if config.auth.attempt_window_ms == 0 {
        problems.push("auth.attempt_window_ms must be positive".to_string());
    }
    if config.auth.lockout_duration_ms == 0 {
        problems.push("auth.lockout_duration_ms must be positive".to_string());
    }
    if config.auth.access_token_ttl_ms == 0 || config.auth.refresh_token_ttl_ms == 0 {
        problems.push("token lifetimes must be positive".to_string());
    }

    problems
}
