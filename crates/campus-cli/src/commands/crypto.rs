//! Field encryption helpers for operators.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Subcommand};

use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_crypto::{FieldCipher, search_hash};

use crate::output::{self, Field, OutputFormat};

/// Arguments for crypto commands
#[derive(Debug, Args)]
pub struct CryptoArgs {
    /// Crypto subcommand
    #[command(subcommand)]
    pub command: CryptoCommand,
}

/// Crypto subcommands
#[derive(Debug, Subcommand)]
pub enum CryptoCommand {
    /// Encrypt a value with the configured field key (prints base64)
    Encrypt {
        /// Plaintext to encrypt
        plaintext: String,
    },
    /// Decrypt a base64 value produced by `encrypt`
    Decrypt {
        /// Base64 of `IV || ciphertext || tag`
        ciphertext: String,
    },
    /// Print the search hash of a value
    SearchHash {
        /// Plaintext to hash
        plaintext: String,
    },
    /// Generate a random 256-bit key, usable as a field key or signing secret
    GenerateKey,
}

/// Execute crypto commands
pub fn execute(args: &CryptoArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        CryptoCommand::Encrypt { plaintext } => {
            let cipher = FieldCipher::from_config(&config.crypto)?;
            let sealed = cipher.seal_searchable(plaintext)?;
            let rows = vec![
                Field::new("ciphertext", STANDARD.encode(sealed.encrypted.to_bytes())),
                Field::new("search_hash", sealed.search_hash),
            ];
            output::print_list(&rows, format);
        }
        CryptoCommand::Decrypt { ciphertext } => {
            let cipher = FieldCipher::from_config(&config.crypto)?;
            let bytes = STANDARD
                .decode(ciphertext.trim())
                .map_err(|e| AppError::validation(format!("Ciphertext is not base64: {e}")))?;
            println!("{}", cipher.decrypt(&bytes)?);
        }
        CryptoCommand::SearchHash { plaintext } => {
            println!("{}", search_hash(plaintext));
        }
        CryptoCommand::GenerateKey => {
            println!("{}", STANDARD.encode(FieldCipher::generate_key()));
        }
    }
    Ok(())
}
