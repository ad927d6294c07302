//! File management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use futures::StreamExt;
use serde::Serialize;
use tabled::Tabled;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use cabinet_core::config::AppConfig;
use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::traits::storage::ByteStream;
use cabinet_entity::file::File;

use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload a local file
    Upload {
        /// Local file to upload
        source: PathBuf,
        /// Target folder ID (omit or `root` for the user root)
        #[arg(short = 'd', long)]
        folder: Option<String>,
        /// Name to store the file under (defaults to the local file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List the files in a folder
    List {
        /// Folder ID (omit or `root` for the user root)
        #[arg(short = 'd', long)]
        folder: Option<String>,
    },
    /// Download a file
    Download {
        /// File ID
        id: String,
        /// Destination path (defaults to the stored name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Permanently delete a file
    Delete {
        /// File ID
        id: String,
    },
    /// Stage a file for deferred deletion
    Trash {
        /// File ID
        id: String,
    },
    /// Restore a staged file
    Restore {
        /// File ID
        id: String,
    },
    /// Mark or unmark a file as favorite
    Favorite {
        /// File ID
        id: String,
        /// Clear the favorite flag instead of setting it
        #[arg(long)]
        off: bool,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: String,
    /// Name
    name: String,
    /// Size
    size: i64,
    /// Folder
    folder: String,
    /// Favorite
    favorite: bool,
    /// Deleted
    deleted: bool,
    /// Updated at
    updated_at: String,
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.clone(),
            name: f.display_name(),
            size: f.file_size,
            folder: f
                .folder_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "root".to_string()),
            favorite: f.is_favorite,
            deleted: f.is_deleted,
            updated_at: f.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config: &AppConfig,
    token: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let facade = super::create_facade(config).await?;

    match &args.command {
        FileCommand::Upload {
            source,
            folder,
            name,
        } => {
            let folder = super::parse_folder_id(folder.as_deref())?;
            let filename = match name {
                Some(name) => name.clone(),
                None => source
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::validation(format!("Cannot derive a name from {}", source.display()))
                    })?,
            };

            let local = tokio::fs::File::open(source).await?;
            let stream: ByteStream = Box::pin(ReaderStream::new(local));
            let file = facade.upload_file(token, stream, &filename, folder).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!(
                    "Uploaded '{}' ({} bytes, id: {})",
                    file.display_name(),
                    file.file_size,
                    file.id
                )),
                OutputFormat::Json => output::print_item(&FileRow::from(&file), format),
            }
        }
        FileCommand::List { folder } => {
            let folder = super::parse_folder_id(folder.as_deref())?;
            let files = facade.list_files(token, folder).await?;
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
        FileCommand::Download { id, output: dest } => {
            let (file, mut stream) = facade.open_file(token, id).await?;
            let dest = dest.clone().unwrap_or_else(|| PathBuf::from(file.display_name()));

            let mut out = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&dest)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Cannot create {}", dest.display()),
                        e,
                    )
                })?;
            let mut written = 0u64;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                written += chunk.len() as u64;
                out.write_all(&chunk).await?;
            }
            out.flush().await?;

            output::print_success(&format!("Saved {written} bytes to {}", dest.display()));
        }
        FileCommand::Delete { id } => {
            let outcome = facade.delete_file(token, id).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!("File {id}: {outcome}")),
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "file_id": id, "outcome": outcome }))
                }
            }
        }
        FileCommand::Trash { id } => {
            let staged = facade.stage_file(token, id).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("File {id} moved to trash"));
                    output::print_kv("Expires at", &staged.expires_at.to_rfc3339());
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&staged)?),
            }
        }
        FileCommand::Restore { id } => {
            let file = facade.restore_file(token, id).await?;
            output::print_item(&FileRow::from(&file), format);
        }
        FileCommand::Favorite { id, off } => {
            let file = facade.set_favorite(token, id, !off).await?;
            if file.is_deleted && format == OutputFormat::Table {
                output::print_warning(&format!("File {id} is staged for deletion"));
            }
            output::print_item(&FileRow::from(&file), format);
        }
    }

    Ok(())
}
