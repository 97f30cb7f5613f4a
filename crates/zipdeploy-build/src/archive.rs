use std::fs::File;
use std::io::BufWriter;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::install::{DependencyInstaller, InstallError, install_requirements};
use crate::select::{ExclusionSet, SelectError, list_files};

const STAGING_PREFIX: &str = "zipdeploy-staging-";

/// Everything needed to turn a source tree into a deployable archive.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    /// Directory whose files are packaged.
    pub source_root: PathBuf,
    pub exclusions: ExclusionSet,
    pub hide_hidden: bool,
    /// Dependency manifest installed into the package root before sources are copied.
    pub requirements: Option<PathBuf>,
    /// Where the zip is written. Replaced if it already exists.
    pub destination: PathBuf,
    /// Parent for the staging directory; the system temp dir when `None`.
    pub staging_parent: Option<PathBuf>,
}

impl PackageSpec {
    pub fn new(source_root: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            exclusions: ExclusionSet::default(),
            hide_hidden: true,
            requirements: None,
            destination: destination.into(),
            staging_parent: None,
        }
    }
}

/// A finished archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArchive {
    pub path: PathBuf,
    /// Member names in the order they were written.
    pub members: Vec<String>,
}

/// Builds the archive described by `spec`.
///
/// Steps, all inside a fresh staging directory:
/// 1. install dependencies (when `spec.requirements` is set)
/// 2. copy every selected source file at its relative path
/// 3. zip the staging tree into `spec.destination`
///
/// The staging directory is removed before this returns, whether it
/// succeeds or fails.
pub fn build_archive<I: DependencyInstaller + ?Sized>(
    spec: &PackageSpec,
    installer: &I,
) -> Result<BuiltArchive, ArchiveError> {
    let staging = create_staging(spec.staging_parent.as_deref())?;
    tracing::debug!(staging = %staging.path().display(), "created staging directory");

    let archive = populate_and_compress(spec, installer, staging.path())?;

    let staging_path = staging.path().to_path_buf();
    staging.close().map_err(|e| ArchiveError::Cleanup {
        path: staging_path,
        source: e,
    })?;

    tracing::info!(
        archive = %archive.path.display(),
        members = archive.members.len(),
        "archive built"
    );
    Ok(archive)
}

fn create_staging(parent: Option<&Path>) -> Result<TempDir, ArchiveError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(STAGING_PREFIX);
    match parent {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
    .map_err(|e| ArchiveError::Staging { source: e })
}

fn populate_and_compress<I: DependencyInstaller + ?Sized>(
    spec: &PackageSpec,
    installer: &I,
    staging: &Path,
) -> Result<BuiltArchive, ArchiveError> {
    if let Some(requirements) = &spec.requirements {
        install_requirements(installer, requirements, staging)?;
    }

    copy_sources(spec, staging)?;

    if spec.destination.exists() {
        tracing::debug!(path = %spec.destination.display(), "removing stale archive");
        std::fs::remove_file(&spec.destination).map_err(|e| ArchiveError::RemoveStale {
            path: spec.destination.clone(),
            source: e,
        })?;
    }

    let members = zip_dir(staging, &spec.destination)?;

    Ok(BuiltArchive {
        path: spec.destination.clone(),
        members,
    })
}

/// Copies the selected files of `spec.source_root` into `staging`,
/// preserving their layout relative to the source root.
///
/// The staging directory and the destination are never selected, even when
/// they sit inside the source root.
fn copy_sources(spec: &PackageSpec, staging: &Path) -> Result<(), ArchiveError> {
    let source_root =
        std::path::absolute(&spec.source_root).map_err(|e| ArchiveError::Io {
            path: spec.source_root.clone(),
            source: e,
        })?;

    let mut exclusions = spec.exclusions.clone();
    exclusions.exclude_path(staging.canonicalize().map_err(|e| ArchiveError::Io {
        path: staging.to_path_buf(),
        source: e,
    })?);
    exclusions.exclude_path(resolve_destination(&spec.destination)?);

    let files = list_files(&source_root, &exclusions, spec.hide_hidden)?;

    for src in &files {
        let relative = src
            .strip_prefix(&source_root)
            .map_err(|e| ArchiveError::StripPrefix {
                path: src.clone(),
                source: e,
            })?;
        let dst = staging.join(relative);

        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ArchiveError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::copy(src, &dst).map_err(|e| ArchiveError::CopyFile {
            path: src.clone(),
            source: e,
        })?;
        tracing::debug!(file = %relative.display(), "staged");
    }

    Ok(())
}

/// Canonical location of the archive. The file itself may not exist yet, so
/// only its parent directory is resolved.
fn resolve_destination(destination: &Path) -> Result<PathBuf, ArchiveError> {
    let absolute = std::path::absolute(destination).map_err(|e| ArchiveError::Io {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) else {
        return Ok(absolute);
    };
    let parent = parent.canonicalize().map_err(|e| ArchiveError::Io {
        path: parent.to_path_buf(),
        source: e,
    })?;
    Ok(parent.join(name))
}

/// Compresses every file under `dir` into a new zip at `destination`.
/// Member names are `/`-separated paths relative to `dir`.
fn zip_dir(dir: &Path, destination: &Path) -> Result<Vec<String>, ArchiveError> {
    let file = File::create(destination).map_err(|e| ArchiveError::Io {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let base_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let compress_err = |e: zip::result::ZipError| ArchiveError::Compress {
        path: destination.to_path_buf(),
        source: e,
    };

    let mut members = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| ArchiveError::StripPrefix {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
        let name = member_name(relative)?;

        let metadata = entry.metadata().map_err(|e| ArchiveError::Walk {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        let options = with_permissions(base_options, &metadata);

        writer.start_file(name.as_str(), options).map_err(compress_err)?;
        let mut src = File::open(entry.path()).map_err(|e| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        std::io::copy(&mut src, &mut writer).map_err(|e| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source: e,
        })?;

        tracing::debug!(member = %name, "zipped");
        members.push(name);
    }

    writer.finish().map_err(compress_err)?;
    Ok(members)
}

/// Archive member name for a path relative to the staging root.
fn member_name(relative: &Path) -> Result<String, ArchiveError> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| ArchiveError::NonUtf8Path {
                    path: relative.to_path_buf(),
                })?;
                parts.push(part);
            }
            _ => {
                return Err(ArchiveError::OutsideRoot {
                    path: relative.to_path_buf(),
                });
            }
        }
    }
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &std::fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &std::fs::Metadata) -> SimpleFileOptions {
    options
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Install(#[from] InstallError),
    #[error("failed to create staging directory")]
    Staging { source: std::io::Error },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to remove stale archive {path}")]
    RemoveStale {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk staging directory {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to write archive {path}")]
    Compress {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: PathBuf },
    #[error("path escapes the package root: {path}")]
    OutsideRoot { path: PathBuf },
    #[error("{path} is not under the package root")]
    StripPrefix {
        path: PathBuf,
        source: std::path::StripPrefixError,
    },
    #[error("failed to remove staging directory {path}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
}
