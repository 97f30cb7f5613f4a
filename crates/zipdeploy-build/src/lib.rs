//! Source selection, dependency installation, and zip packaging for zipdeploy.
//!
//! # Packaging pipeline
//!
//! ```text
//! build_archive()
//!   1. Staging    ── fresh temp dir (removed on every exit path)
//!   2. Install    ── <installer> install -r requirements.txt --target <staging>
//!   3. Select     ── walk source root, prune hidden + excluded names
//!   4. Copy       ── selected files → <staging>/<relative path>
//!   5. Compress   ── <staging> → <temp>/<function>.zip (stale copy removed first)
//! ```
//!
//! # Exclusion rules
//!
//! An entry is skipped, and never descended into, when its own name:
//! - starts with `.` (unless hidden entries are requested)
//! - is one of [`select::DEFAULT_EXCLUDES`]
//! - is one of the caller's extra exclusions
//!
//! Installed dependencies are not subject to selection: everything the
//! installer writes into staging ends up in the archive.

pub mod archive;
pub mod install;
pub mod select;

pub use archive::{ArchiveError, BuiltArchive, PackageSpec, build_archive};
pub use install::{DependencyInstaller, InstallError, PipInstaller, install_requirements};
pub use select::{ExclusionSet, SelectError, list_files};
