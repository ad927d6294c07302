//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;
use cabinet_entity::folder::{Folder, FolderNode};

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List the child folders of a folder
    List {
        /// Parent folder ID (omit or `root` for the user root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit or `root` for the user root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Delete a folder with everything inside it
    Delete {
        /// Folder ID
        id: i64,
    },
    /// Show the whole folder tree
    Tree,
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: i64,
    /// Name
    name: String,
    /// Parent
    parent: String,
    /// Path
    path: String,
    /// Created at
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id,
            name: f.folder_name.clone(),
            parent: f
                .parent_folder_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "root".to_string()),
            path: f.folder_path.clone(),
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    token: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let facade = super::create_facade(config).await?;

    match &args.command {
        FolderCommand::List { parent } => {
            let parent = super::parse_folder_id(parent.as_deref())?;
            let folders = facade.list_child_folders(token, parent).await?;
            let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, parent } => {
            let parent = super::parse_folder_id(parent.as_deref())?;
            let folder = facade.create_folder(token, name, parent).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!(
                    "Folder '{}' created (id: {})",
                    folder.folder_name, folder.id
                )),
                OutputFormat::Json => output::print_item(&FolderRow::from(&folder), format),
            }
        }
        FolderCommand::Delete { id } => {
            let outcome = facade.delete_folder(token, *id).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("Folder {id}: {outcome}"));
                }
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "folder_id": id, "outcome": outcome })
                ),
            }
        }
        FolderCommand::Tree => {
            let forest = facade.folder_tree(token).await?;
            match format {
                OutputFormat::Table => {
                    println!("/");
                    print_nodes(&forest, 1);
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&forest)?;
                    println!("{json}");
                }
            }
        }
    }

    Ok(())
}

fn print_nodes(nodes: &[FolderNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        println!("{}├── {}/ ({})", indent, node.folder.folder_name, node.folder.id);
        print_nodes(&node.children, depth + 1);
    }
}
