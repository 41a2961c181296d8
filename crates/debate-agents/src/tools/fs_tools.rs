//! File system tools: read and list files in the local-files directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use coordination::{Capability, CapabilityError};
use tracing::debug;

use super::{sandbox_check, ToolError};

pub const READ_DESCRIPTION: &str = "Read a file from the local files directory by name. \
     Supports text files (.txt, .md, .json, .csv, .xml, .yaml). \
     Useful for project documentation, configurations, and context files.";

pub const LIST_DESCRIPTION: &str =
    "List all files available in the local files directory, with their file types.";

const SUPPORTED_TYPES_FOOTER: &str =
    "Supported file types: Text (.txt, .md, .json, .csv, .xml, .yaml, .yml)";

/// Human-readable description of a file extension (without the dot).
pub fn file_type_description(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "PDF document",
        "txt" => "Text file",
        "md" => "Markdown file",
        "json" => "JSON file",
        "csv" => "CSV file",
        "xml" => "XML file",
        "yaml" | "yml" => "YAML file",
        _ => "Text file",
    }
}

// ---------------------------------------------------------------------------
// ReadLocalFileTool
// ---------------------------------------------------------------------------

/// Read a text file from the local-files directory.
///
/// Only the base name of the argument is used, so `../../etc/passwd` is read
/// as `passwd` inside the directory.
pub struct ReadLocalFileTool {
    pub root: PathBuf,
}

impl ReadLocalFileTool {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub async fn read(&self, filename: &str) -> Result<String, ToolError> {
        let base = Path::new(filename.trim())
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ToolError::InvalidName(filename.to_string()))?;

        let extension = Path::new(base)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if extension.eq_ignore_ascii_case("pdf") {
            return Err(ToolError::Unsupported(format!(
                "'{base}' is a PDF document; only text files can be read"
            )));
        }

        let is_file = tokio::fs::metadata(self.root.join(base))
            .await
            .is_ok_and(|meta| meta.is_file());
        if !is_file {
            return Err(ToolError::NotFound {
                name: base.to_string(),
                dir: self.root.display().to_string(),
            });
        }

        let path = sandbox_check(&self.root, base)?;
        debug!(path = %path.display(), "reading local file");
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

#[async_trait]
impl Capability for ReadLocalFileTool {
    async fn invoke(&self, argument: &str) -> Result<String, CapabilityError> {
        Ok(self.read(argument).await?)
    }
}

// ---------------------------------------------------------------------------
// ListLocalFilesTool
// ---------------------------------------------------------------------------

/// List the non-hidden files of the local-files directory, sorted by name.
pub struct ListLocalFilesTool {
    pub root: PathBuf,
}

impl ListLocalFilesTool {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub async fn list(&self) -> Result<String, ToolError> {
        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !entry.file_type().await?.is_file() {
                continue;
            }
            names.push(name);
        }
        names.sort();

        if names.is_empty() {
            return Ok(format!("No files found in {}", self.root.display()));
        }

        let listing = names
            .iter()
            .map(|name| {
                let extension = Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                format!("- {} ({})", name, file_type_description(extension))
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "Available files in {}:\n{}\n\n{}",
            self.root.display(),
            listing,
            SUPPORTED_TYPES_FOOTER
        ))
    }
}

#[async_trait]
impl Capability for ListLocalFilesTool {
    /// The argument is ignored.
    async fn invoke(&self, _argument: &str) -> Result<String, CapabilityError> {
        Ok(self.list().await?)
    }
}
