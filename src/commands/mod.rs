//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod migrate;
pub mod status;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use cabinet_auth::JwtIdentityResolver;
use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;
use cabinet_database::DatabasePool;
use cabinet_database::migration::run_migrations;
use cabinet_service::StorageFacade;
use cabinet_storage::LocalStorageProvider;

use crate::output::OutputFormat;

/// Cabinet: multi-tenant hierarchical file and folder storage
#[derive(Debug, Parser)]
#[command(name = "cabinet", version, about, long_about = None)]
pub struct Cli {
    /// Path to an additional configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Access token identifying the acting user
    #[arg(long, env = "CABINET_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Access token management
    Token(token::TokenArgs),
    /// Check database and storage health
    Status,
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config, self.format).await,
            Commands::Token(args) => token::execute(args, config, self.format),
            Commands::Status => status::execute(config, self.format).await,
            Commands::Folder(args) => {
                folder::execute(args, config, self.require_token()?, self.format).await
            }
            Commands::File(args) => {
                file::execute(args, config, self.require_token()?, self.format).await
            }
        }
    }

    fn require_token(&self) -> Result<&str, AppError> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::invalid_credentials("No token given; pass --token or set CABINET_TOKEN"))
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: wire the storage facade from config, applying pending migrations
pub async fn create_facade(config: &AppConfig) -> Result<StorageFacade, AppError> {
    let db = create_db_pool(config).await?;
    run_migrations(db.pool()).await?;

    let storage = LocalStorageProvider::new(&config.storage.root_path).await?;
    let identity = JwtIdentityResolver::new(&config.auth);

    Ok(StorageFacade::new(
        db,
        Arc::new(identity),
        Arc::new(storage),
        &config.storage,
    ))
}

/// Parse a folder argument; `root` or absence selects the user root.
pub fn parse_folder_id(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw {
        None | Some("root") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid folder id '{s}'"))),
    }
}
