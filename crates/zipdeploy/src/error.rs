use std::fmt;
use std::path::PathBuf;

use zipdeploy_build::{ArchiveError, InstallError, SelectError};
use zipdeploy_cloud::{FunctionError, PublishError, StorageError};

pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an [`Error`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuration,
    Selection,
    Install,
    Package,
    Upload,
    Update,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Configuration => "configuration",
            Phase::Selection => "selection",
            Phase::Install => "install",
            Phase::Package => "package",
            Phase::Upload => "upload",
            Phase::Update => "update",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{phase} failed: not found: {path}")]
    NotFound { phase: Phase, path: PathBuf },

    #[error("selection failed: could not list source files")]
    Selection { source: SelectError },

    #[error("install failed: dependency installation failed")]
    DependencyInstall { source: InstallError },

    #[error("package failed: could not build archive")]
    Packaging { source: ArchiveError },

    #[error("upload failed: could not store archive")]
    Upload { source: StorageError },

    #[error("update failed: could not update function code")]
    Update { source: FunctionError },

    #[error("configuration failed")]
    Config {
        #[from]
        source: zipdeploy_core::Error,
    },
}

impl Error {
    pub fn phase(&self) -> Phase {
        match self {
            Error::NotFound { phase, .. } => *phase,
            Error::Selection { .. } => Phase::Selection,
            Error::DependencyInstall { .. } => Phase::Install,
            Error::Packaging { .. } => Phase::Package,
            Error::Upload { .. } => Phase::Upload,
            Error::Update { .. } => Phase::Update,
            Error::Config { .. } => Phase::Configuration,
        }
    }
}

impl From<ArchiveError> for Error {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Select(SelectError::NotFound { path }) => Error::NotFound {
                phase: Phase::Selection,
                path,
            },
            ArchiveError::Select(source) => Error::Selection { source },
            ArchiveError::Install(InstallError::RequirementsNotFound { path }) => Error::NotFound {
                phase: Phase::Install,
                path,
            },
            ArchiveError::Install(source) => Error::DependencyInstall { source },
            source => Error::Packaging { source },
        }
    }
}

impl From<PublishError> for Error {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::ArchiveMissing { path } => Error::NotFound {
                phase: Phase::Upload,
                path,
            },
            PublishError::Upload { source } => Error::Upload { source },
            PublishError::Update { source } => Error::Update { source },
        }
    }
}
