use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Materializes third-party dependencies into a directory.
///
/// Production code uses [`PipInstaller`]; tests substitute fakes that write
/// files directly.
pub trait DependencyInstaller {
    /// Install everything listed in `requirements` flat into `target`.
    fn install(&self, requirements: &Path, target: &Path) -> Result<(), InstallError>;
}

/// Runs `<program> install --requirement <file> --target <dir>`.
#[derive(Debug, Clone)]
pub struct PipInstaller {
    program: String,
}

impl PipInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for PipInstaller {
    fn default() -> Self {
        Self::new("pip")
    }
}

impl DependencyInstaller for PipInstaller {
    fn install(&self, requirements: &Path, target: &Path) -> Result<(), InstallError> {
        let output = Command::new(&self.program)
            .arg("install")
            .arg("--requirement")
            .arg(requirements)
            .arg("--target")
            .arg(target)
            .arg("--disable-pip-version-check")
            .output()
            .map_err(|e| InstallError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InstallError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: stderr.trim().to_owned(),
            });
        }

        Ok(())
    }
}

/// Installs `requirements` into `target_dir` with the given installer.
///
/// The manifest must exist; installer failures are reported, never ignored.
pub fn install_requirements<I: DependencyInstaller + ?Sized>(
    installer: &I,
    requirements: &Path,
    target_dir: &Path,
) -> Result<(), InstallError> {
    if !requirements.is_file() {
        return Err(InstallError::RequirementsNotFound {
            path: requirements.to_path_buf(),
        });
    }

    tracing::info!(
        requirements = %requirements.display(),
        target = %target_dir.display(),
        "installing dependencies"
    );
    installer.install(requirements, target_dir)
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("requirements file not found: {path}")]
    RequirementsNotFound { path: PathBuf },
    #[error("failed to run installer `{program}`")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("installer `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}
