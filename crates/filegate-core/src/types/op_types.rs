//! Request and outcome types for gateway operations

use serde::{Deserialize, Serialize};

/// Request to delete files matched by glob patterns inside a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    /// The directory containing the files to delete
    pub directory: String,
    /// File patterns to delete (e.g. `*.tar.gz`, `*.obscpio`)
    pub patterns: Vec<String>,
}

/// Aggregated result of one delete batch
///
/// `success` reflects whether the request itself was well-formed and passed
/// the sandbox check. Individual files that could not be removed are logged
/// and omitted from `deleted_files`; they never fail the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeletionOutcome {
    /// Structural failure: the request never reached the removal loop.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            deleted_files: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// The batch ran; `deleted_files` lists what was actually removed.
    pub fn completed(deleted_files: Vec<String>) -> Self {
        Self {
            success: true,
            deleted_files,
            error: None,
        }
    }
}

/// Request to replace the full contents of one file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// The checkout directory where the file lives
    pub directory: String,
    /// Bare file name, no separators and no `..`
    pub filename: String,
    /// The new content to write
    pub content: String,
}

/// Result of a successful full-file write
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub success: bool,
    /// Absolute path of the written file
    pub path: String,
    /// Byte count written
    pub size: u64,
    /// Whether the file was created rather than overwritten
    pub created: bool,
    /// SHA256 of the written content
    pub sha256: String,
    pub message: String,
}
