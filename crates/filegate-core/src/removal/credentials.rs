//! Ephemeral config artifacts for the external removal tool
//!
//! The tool authenticates through a single-use config file. One artifact is
//! materialized per batch and handed to the invoker as an opaque path; the
//! guard removes the file when it drops, on every exit path.

use crate::error::Result;
use crate::types::ToolCredentials;
use async_trait::async_trait;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Handle to a materialized tool config. Dropping the guard deletes the
/// underlying file.
pub struct ToolConfigGuard {
    file: NamedTempFile,
}

impl ToolConfigGuard {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Source of the removal tool's ephemeral config file
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Write a single-use config file scoped to one batch.
    async fn materialize(&self) -> Result<ToolConfigGuard>;
}

#[async_trait]
impl CredentialSource for ToolCredentials {
    async fn materialize(&self) -> Result<ToolConfigGuard> {
        let file = NamedTempFile::new()?;

        let contents = format!(
            "[general]\napiurl = {url}\n\n[{url}]\nuser = {user}\npass = {pass}\n",
            url = self.api_url,
            user = self.username,
            pass = self.password,
        );
        tokio::fs::write(file.path(), contents).await?;

        debug!("Materialized tool config: {:?}", file.path());
        Ok(ToolConfigGuard { file })
    }
}
