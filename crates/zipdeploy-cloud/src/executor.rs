use crate::aws::AwsError;

/// Abstraction over aws CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait AwsExecutor: Send + Sync {
    /// Execute an aws command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, AwsError>;
}

/// Real aws CLI executor.
///
/// Credentials come from the environment the CLI already understands
/// (`AWS_PROFILE`, `~/.aws/credentials`, instance roles). A configured
/// profile or region is appended to every command.
#[derive(Debug, Clone, Default)]
pub struct RealExecutor {
    profile: Option<String>,
    region: Option<String>,
}

impl RealExecutor {
    pub fn new(profile: Option<String>, region: Option<String>) -> Self {
        Self { profile, region }
    }

    /// `args` plus the global `--profile` / `--region` options.
    pub fn full_args(&self, args: &[String]) -> Vec<String> {
        let mut full = args.to_vec();
        if let Some(profile) = &self.profile {
            full.push("--profile".to_owned());
            full.push(profile.clone());
        }
        if let Some(region) = &self.region {
            full.push("--region".to_owned());
            full.push(region.clone());
        }
        full
    }
}

impl AwsExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, AwsError> {
        use std::process::Stdio;

        let full = self.full_args(args);
        tracing::debug!(args = ?full, "running aws");

        let output = tokio::process::Command::new("aws")
            .args(&full)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AwsError::NotFound { source: e })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| AwsError::InvalidUtf8 { source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(AwsError::CommandFailed { args: full, stderr })
        }
    }
}
