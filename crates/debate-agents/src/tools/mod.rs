//! Host capabilities exposed to responders through the capability-call
//! protocol.
//!
//! Each tool implements [`coordination::Capability`] and is registered in a
//! [`CapabilityRegistry`] under a stable name. File tools are sandboxed to the
//! configured local-files directory.

pub mod fs_tools;
pub mod web_search;

use std::path::{Path, PathBuf};

use coordination::{CapabilityDescriptor, CapabilityError, CapabilityRegistry, DebateError};

pub use fs_tools::{ListLocalFilesTool, ReadLocalFileTool};
pub use web_search::WebSearchTool;

pub const WEB_SEARCH: &str = "web_search";
pub const READ_LOCAL_FILE: &str = "read_local_file";
pub const LIST_LOCAL_FILES: &str = "list_local_files";

/// Errors that can occur during tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path `{0}` escapes sandbox")]
    Sandbox(String),

    #[error("File '{name}' not found in {dir}")]
    NotFound { name: String, dir: String },

    #[error("invalid file name `{0}`")]
    InvalidName(String),

    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

impl From<ToolError> for CapabilityError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Io(e) => CapabilityError::Io(e),
            ToolError::Sandbox(path) => CapabilityError::Sandbox(path),
            other => CapabilityError::Failed(other.to_string()),
        }
    }
}

/// Validate that a resolved path stays within the sandbox root.
///
/// Returns the canonicalized path on success.
pub fn sandbox_check(root: &Path, relative_path: &str) -> Result<PathBuf, ToolError> {
    let resolved = root.join(relative_path).canonicalize()?;
    let canon_root = root.canonicalize()?;

    if !resolved.starts_with(&canon_root) {
        return Err(ToolError::Sandbox(relative_path.to_string()));
    }
    Ok(resolved)
}

/// Registry with every host tool, in a fixed order:
/// `web_search`, `read_local_file`, `list_local_files`.
pub fn default_registry(local_files_dir: &Path) -> Result<CapabilityRegistry, DebateError> {
    CapabilityRegistry::new()
        .with(CapabilityDescriptor::from_handler(
            WEB_SEARCH,
            web_search::DESCRIPTION,
            WebSearchTool::new(),
        ))?
        .with(CapabilityDescriptor::from_handler(
            READ_LOCAL_FILE,
            fs_tools::READ_DESCRIPTION,
            ReadLocalFileTool::new(local_files_dir),
        ))?
        .with(CapabilityDescriptor::from_handler(
            LIST_LOCAL_FILES,
            fs_tools::LIST_DESCRIPTION,
            ListLocalFilesTool::new(local_files_dir),
        ))
}
