use std::path::PathBuf;

/// Where an archive is stored and which function is repointed at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    function_name: String,
    bucket: String,
}

impl DeploymentTarget {
    pub fn new(function_name: impl Into<String>, bucket: impl Into<String>) -> crate::Result<Self> {
        let function_name = function_name.into();
        let bucket = bucket.into();

        validate_function_name(&function_name)?;
        if bucket.trim().is_empty() {
            return Err(crate::Error::MissingBucketName);
        }

        Ok(Self {
            function_name,
            bucket,
        })
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key the archive is stored under: `<function>.zip`.
    pub fn object_key(&self) -> String {
        archive_file_name(&self.function_name)
    }

    /// Local archive location: `<temp dir>/<function>.zip`.
    pub fn archive_path(&self) -> PathBuf {
        archive_path_for(&self.function_name)
    }
}

/// Local archive location for a function, without requiring a bucket.
///
/// Used by packaging-only flows; the name is validated the same way
/// [`DeploymentTarget::new`] validates it.
pub fn archive_path_for_function(function_name: &str) -> crate::Result<PathBuf> {
    validate_function_name(function_name)?;
    Ok(archive_path_for(function_name))
}

fn archive_path_for(function_name: &str) -> PathBuf {
    std::env::temp_dir().join(archive_file_name(function_name))
}

fn archive_file_name(function_name: &str) -> String {
    format!("{function_name}.zip")
}

fn validate_function_name(name: &str) -> crate::Result<()> {
    if name.trim().is_empty() {
        return Err(crate::Error::MissingFunctionName);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(crate::Error::InvalidFunctionName {
            name: name.to_owned(),
            reason: "must not contain path separators",
        });
    }
    if name == "." || name == ".." {
        return Err(crate::Error::InvalidFunctionName {
            name: name.to_owned(),
            reason: "must not be a relative path component",
        });
    }
    Ok(())
}
