use crate::aws::AwsError;
use crate::executor::{AwsExecutor, RealExecutor};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Blob storage the archive is uploaded to.
#[allow(async_fn_in_trait)]
pub trait ObjectStorage: Send + Sync {
    /// Store the file at `body` under `bucket`/`key`, replacing any existing object.
    async fn put_object(&self, bucket: &str, key: &str, body: &Path) -> Result<(), StorageError>;
}

/// Function-management service whose code is repointed at an uploaded archive.
#[allow(async_fn_in_trait)]
pub trait FunctionManager: Send + Sync {
    /// Point `function_name` at `bucket`/`key`. With `publish`, a new
    /// immutable version is created as part of the same call.
    async fn update_function_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
        publish: bool,
    ) -> Result<FunctionVersion, FunctionError>;
}

/// The function configuration returned after a code update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionVersion {
    pub function_name: String,
    pub function_arn: String,
    /// `$LATEST` when not published, otherwise the new version number.
    pub version: String,
    pub code_sha256: String,
}

/// AWS operations client, parameterized over the executor for testability.
pub struct AwsClient<E: AwsExecutor = RealExecutor> {
    executor: E,
}

impl AwsClient<RealExecutor> {
    pub fn new(profile: Option<String>, region: Option<String>) -> Self {
        Self {
            executor: RealExecutor::new(profile, region),
        }
    }
}

impl Default for AwsClient<RealExecutor> {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl<E: AwsExecutor> AwsClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Doctor ──

    /// Run all diagnostic checks without early return.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        // 1. aws CLI
        match self.executor.exec(&args(["--version"])).await {
            // aws CLI v1 prints its version to stderr
            Ok(v) if v.trim().is_empty() => {
                report.aws_cli = CheckResult::fail("no version output, aws CLI v2 required");
            }
            Ok(v) => {
                // "aws-cli/2.15.0 Python/3.11.6 Linux/6.5 exe/x86_64"
                let version = v
                    .split_whitespace()
                    .next()
                    .and_then(|word| word.strip_prefix("aws-cli/"))
                    .unwrap_or(v.trim());
                report.aws_cli = CheckResult::ok(version);
            }
            Err(e) => report.aws_cli = CheckResult::fail(&e.to_string()),
        }

        // 2. Credentials
        match self
            .executor
            .exec(&args([
                "sts",
                "get-caller-identity",
                "--query",
                "Arn",
                "--output",
                "text",
            ]))
            .await
        {
            Ok(arn) if !arn.trim().is_empty() => report.identity = CheckResult::ok(arn.trim()),
            Ok(_) => report.identity = CheckResult::fail("no caller identity"),
            Err(e) => report.identity = CheckResult::fail(&e.to_string()),
        }

        report
    }
}

impl<E: AwsExecutor> ObjectStorage for AwsClient<E> {
    async fn put_object(&self, bucket: &str, key: &str, body: &Path) -> Result<(), StorageError> {
        let body_str = body
            .to_str()
            .ok_or_else(|| StorageError::InvalidPath(body.to_path_buf()))?;

        self.executor
            .exec(&args([
                "s3api",
                "put-object",
                "--bucket",
                bucket,
                "--key",
                key,
                "--body",
                body_str,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| StorageError::PutObject {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                source: e,
            })?;

        Ok(())
    }
}

impl<E: AwsExecutor> FunctionManager for AwsClient<E> {
    async fn update_function_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
        publish: bool,
    ) -> Result<FunctionVersion, FunctionError> {
        let publish_flag = if publish { "--publish" } else { "--no-publish" };

        let output = self
            .executor
            .exec(&args([
                "lambda",
                "update-function-code",
                "--function-name",
                function_name,
                "--s3-bucket",
                bucket,
                "--s3-key",
                key,
                publish_flag,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| FunctionError::UpdateCode {
                function: function_name.to_owned(),
                source: e,
            })?;

        serde_json::from_str(&output).map_err(|e| FunctionError::InvalidResponse {
            function: function_name.to_owned(),
            source: e,
        })
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub aws_cli: CheckResult,
    pub identity: CheckResult,
    pub config_file: CheckResult,
    pub installer: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.aws_cli.passed && self.identity.passed && self.config_file.passed && self.installer.passed
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("aws CLI", &self.aws_cli),
            ("Identity", &self.identity),
            ("Config file", &self.config_file),
            ("Installer", &self.installer),
        ];
        for (label, result) in rows {
            writeln!(f, "{:<12} [{}] {}", label, result.icon(), result.detail)?;
        }
        if self.all_passed() {
            write!(f, "All checks passed.")
        } else {
            write!(f, "Some checks failed.")
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("archive path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("put-object to s3://{bucket}/{key} failed")]
    PutObject {
        bucket: String,
        key: String,
        source: AwsError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("update-function-code for '{function}' failed")]
    UpdateCode { function: String, source: AwsError },

    #[error("unexpected update-function-code response for '{function}'")]
    InvalidResponse {
        function: String,
        source: serde_json::Error,
    },
}
