use crate::client::{FunctionError, FunctionManager, FunctionVersion, ObjectStorage, StorageError};
use std::path::{Path, PathBuf};
use zipdeploy_core::DeploymentTarget;

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub bucket: String,
    pub key: String,
    pub function: FunctionVersion,
}

/// Upload the archive, then repoint the function at it and publish a version.
///
/// There is no rollback: if the update fails the uploaded object stays in
/// place and the function keeps its previous code. Retry the whole call.
pub async fn publish<S, F>(
    target: &DeploymentTarget,
    archive: &Path,
    storage: &S,
    functions: &F,
) -> Result<PublishOutcome, PublishError>
where
    S: ObjectStorage,
    F: FunctionManager,
{
    let key = upload(target, archive, storage).await?;
    let function = update_code(target, &key, functions).await?;

    Ok(PublishOutcome {
        bucket: target.bucket().to_owned(),
        key,
        function,
    })
}

/// Upload step of [`publish`]. Returns the object key written.
pub async fn upload<S: ObjectStorage>(
    target: &DeploymentTarget,
    archive: &Path,
    storage: &S,
) -> Result<String, PublishError> {
    if !archive.is_file() {
        return Err(PublishError::ArchiveMissing {
            path: archive.to_path_buf(),
        });
    }

    let key = target.object_key();
    tracing::info!(bucket = target.bucket(), key = %key, "uploading archive");
    storage
        .put_object(target.bucket(), &key, archive)
        .await
        .map_err(|e| PublishError::Upload { source: e })?;

    Ok(key)
}

/// Update step of [`publish`]: point the function at `key` and publish.
pub async fn update_code<F: FunctionManager>(
    target: &DeploymentTarget,
    key: &str,
    functions: &F,
) -> Result<FunctionVersion, PublishError> {
    tracing::info!(function = target.function_name(), key, "updating function code");
    let version = functions
        .update_function_code(target.function_name(), target.bucket(), key, true)
        .await
        .map_err(|e| PublishError::Update { source: e })?;

    tracing::info!(
        function = target.function_name(),
        version = %version.version,
        "published function version"
    );
    Ok(version)
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("archive not found: {path}")]
    ArchiveMissing { path: PathBuf },

    #[error("upload failed")]
    Upload { source: StorageError },

    #[error("function update failed")]
    Update { source: FunctionError },
}
