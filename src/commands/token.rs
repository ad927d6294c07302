//! Access token commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use cabinet_auth::JwtEncoder;
use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;

use crate::output::{self, OutputFormat};

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
    /// Issue an access token for a user
    Issue {
        /// User ID (also the name of the user's storage directory)
        #[arg(short, long)]
        user: String,
    },
}

/// Issued token display row
#[derive(Debug, Serialize, Tabled)]
struct TokenRow {
    /// User
    user_id: String,
    /// Token
    token: String,
    /// Expires at
    expires_at: String,
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Issue { user } => {
            let (token, expires_at) = JwtEncoder::new(&config.auth).issue_with_expiry(user)?;
            match format {
                OutputFormat::Table => {
                    output::print_kv("User", user);
                    output::print_kv("Expires at", &expires_at.to_rfc3339());
                    println!("{token}");
                }
                OutputFormat::Json => output::print_item(
                    &TokenRow {
                        user_id: user.clone(),
                        token,
                        expires_at: expires_at.to_rfc3339(),
                    },
                    format,
                ),
            }
        }
    }
    Ok(())
}
