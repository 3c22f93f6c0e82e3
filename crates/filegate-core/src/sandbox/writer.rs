//! Full-content file writes inside the sandbox

use crate::error::{Error, Result, SandboxError};
use crate::types::WriteOutcome;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Permission mode for every file the gateway writes
#[cfg(unix)]
const WRITE_MODE: u32 = 0o644;

pub struct FileWriter;

impl FileWriter {
    /// Write `content` to `path`, overwriting any existing file and creating
    /// it if absent. The caller must have validated containment and that the
    /// parent directory exists; this only performs the write itself.
    ///
    /// Any I/O failure aborts the whole edit. There is no partial-success
    /// shape for a single-file write.
    pub async fn write(path: impl AsRef<Path>, content: &[u8]) -> Result<WriteOutcome> {
        let path = path.as_ref();

        debug!("Writing file: {:?}", path);

        let existed_before = path.exists();

        fs::write(path, content).await.map_err(|e| {
            Error::Sandbox(SandboxError::WriteFailed {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
            })
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, std::fs::Permissions::from_mode(WRITE_MODE))
                .await
                .map_err(|e| {
                    Error::Sandbox(SandboxError::WriteFailed {
                        path: path.to_string_lossy().to_string(),
                        reason: format!("failed to set permissions: {}", e),
                    })
                })?;
        }

        let mut hasher = Sha256::new();
        hasher.update(content);
        let sha256 = hex::encode(hasher.finalize());

        let size = content.len() as u64;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        info!("Wrote {} bytes to {:?}", size, path);

        Ok(WriteOutcome {
            success: true,
            path: path.to_string_lossy().to_string(),
            size,
            created: !existed_before,
            sha256,
            message: format!("Successfully wrote {} bytes to {}", size, file_name),
        })
    }
}
