//! Gateway operations: batched deletes and full-file edits
//!
//! The two failure tiers never share a propagation path. Structural problems
//! (missing fields, containment violations) short-circuit before any file is
//! touched; per-file removal failures are logged, skipped and accumulated
//! past, so one bad file never fails the batch.

use crate::error::{Error, RequestError, Result, SandboxError};
use crate::removal::{CredentialSource, RemovalInvoker, RemovalReport};
use crate::sandbox::{FileWriter, PatternMatcher, Sandbox};
use crate::types::{DeleteRequest, DeletionOutcome, EditRequest, GatewayConfig, WriteOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Sandboxed file-operations gateway
///
/// Holds the process-wide sandbox root and the removal tool settings; both
/// are immutable after construction. One instance serves all requests.
pub struct Gateway {
    sandbox: Sandbox,
    invoker: RemovalInvoker,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let sandbox = Sandbox::new(&config.sandbox_root)?;
        let invoker = RemovalInvoker::new(config.tool);
        let credentials = config
            .credentials
            .map(|c| Arc::new(c) as Arc<dyn CredentialSource>);

        Ok(Self {
            sandbox,
            invoker,
            credentials,
        })
    }

    /// Replace the credential source, e.g. with one backed by a secret store.
    pub fn with_credential_source(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Delete every regular file matched by `patterns` inside `directory`.
    ///
    /// Structural failures (empty fields, containment violation) produce
    /// `success: false` and stop before any deletion. Once the loop starts,
    /// the batch is best-effort: a pattern that fails to expand or a file
    /// that fails to delete is logged and skipped, and `success` stays true.
    /// Cancellation aborts the remaining batch, reporting what was removed.
    pub async fn delete_files(
        &self,
        cancel: &CancellationToken,
        request: DeleteRequest,
    ) -> DeletionOutcome {
        let batch = Uuid::new_v4();
        debug!("Delete batch {}: {:?}", batch, request);

        if request.directory.is_empty() {
            return DeletionOutcome::failure(RequestError::MissingField("directory").to_string());
        }
        if request.patterns.is_empty() {
            return DeletionOutcome::failure(RequestError::NoPatterns.to_string());
        }

        let directory = match self.sandbox.contain(&request.directory) {
            Ok(directory) => directory,
            Err(e) => return DeletionOutcome::failure(e.to_string()),
        };

        // One config artifact per batch, shared across all files. The guard
        // removes the file when this function returns, on every exit path.
        let config_guard = match &self.credentials {
            Some(source) => match source.materialize().await {
                Ok(guard) => Some(guard),
                Err(e) => {
                    warn!("Failed to write tool config, proceeding without: {}", e);
                    None
                }
            },
            None => None,
        };
        let config_path = config_guard.as_ref().map(|guard| guard.path());

        let mut deleted_files = Vec::new();

        'batch: for pattern in &request.patterns {
            let matches = match PatternMatcher::expand(&directory, pattern).await {
                Ok(matches) => matches,
                Err(e) => {
                    warn!("Skipping pattern '{}': {}", pattern, e);
                    continue;
                }
            };

            for path in matches {
                if cancel.is_cancelled() {
                    warn!("Delete batch {} cancelled, aborting", batch);
                    break 'batch;
                }

                let Some(filename) = path.file_name().map(|n| n.to_string_lossy().to_string())
                else {
                    continue;
                };

                let report = self
                    .invoker
                    .remove(cancel, config_path, &directory, &filename)
                    .await;

                match report {
                    RemovalReport::Removed { tier } => {
                        info!("Batch {}: removed {} ({:?})", batch, filename, tier);
                        deleted_files.push(filename);
                    }
                    RemovalReport::Cancelled => {
                        warn!("Delete batch {} cancelled, aborting", batch);
                        break 'batch;
                    }
                    RemovalReport::Failed { error } => {
                        warn!("Batch {}: could not remove {}: {}", batch, filename, error);
                    }
                }
            }
        }

        info!(
            "Delete batch {} finished: {} file(s) removed",
            batch,
            deleted_files.len()
        );
        DeletionOutcome::completed(deleted_files)
    }

    /// Replace the full contents of one file inside the sandbox.
    ///
    /// Unlike deletion there is no partial-success shape: the caller either
    /// gets a [`WriteOutcome`] for a completed write or an error, and on
    /// error must assume no write occurred.
    pub async fn edit_file(&self, request: EditRequest) -> Result<WriteOutcome> {
        debug!(
            "Edit request: {}/{} ({} bytes)",
            request.directory,
            request.filename,
            request.content.len()
        );

        if request.directory.is_empty() {
            return Err(Error::Request(RequestError::MissingField("directory")));
        }
        if request.filename.is_empty() {
            return Err(Error::Request(RequestError::MissingField("filename")));
        }
        if request.content.is_empty() {
            return Err(Error::Request(RequestError::EmptyContent));
        }

        // The raw-string check runs before any joining; the joined result is
        // then contained again. Both must pass.
        Sandbox::validate_filename(&request.filename)?;

        let directory = self.sandbox.contain(&request.directory)?;
        if !directory.is_dir() {
            return Err(Error::Sandbox(SandboxError::DirectoryNotFound(
                request.directory.clone(),
            )));
        }

        let path = self.sandbox.contain(directory.join(&request.filename))?;

        FileWriter::write(&path, request.content.as_bytes()).await
    }
}
