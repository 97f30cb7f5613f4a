use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Names zipdeploy always leaves out of a package: interpreter caches and
/// packaging metadata that has no business inside a function bundle.
pub const DEFAULT_EXCLUDES: &[&str] = &["__pycache__", "pip", "setup.py", "setup.cfg", "MANIFEST.in"];

/// Prefix marking an entry as hidden.
const HIDDEN_PREFIX: &[u8] = b".";

/// Entries skipped during selection.
///
/// Always holds [`DEFAULT_EXCLUDES`]; caller-supplied names are merged in by
/// set union. Matching is on the entry's own name, so excluding a directory
/// name prunes every subtree with that name, at any depth.
///
/// Specific locations can be excluded as well with [`exclude_path`]
/// (e.g. an output directory that lives inside the tree being walked).
///
/// [`exclude_path`]: ExclusionSet::exclude_path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
    paths: BTreeSet<PathBuf>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_EXCLUDES.iter().map(|s| (*s).to_owned()).collect(),
            paths: BTreeSet::new(),
        }
    }
}

impl ExclusionSet {
    /// The built-in defaults unioned with `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.extend(extra);
        set
    }

    pub fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names
            .extend(extra.into_iter().map(Into::into).filter(|s| !s.is_empty()));
    }

    pub fn contains(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Skip the entry at exactly this location, and its subtree if it is a
    /// directory. Pass an absolute, canonical path.
    pub fn exclude_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(path.into());
    }

    /// Whether `path`, or the location it resolves to, was excluded with
    /// [`exclude_path`](ExclusionSet::exclude_path).
    pub fn contains_path(&self, path: &Path) -> bool {
        if self.paths.is_empty() {
            return false;
        }
        // arch-lint: allow(no-error-swallowing) reason="an unresolvable entry cannot be an excluded location"
        self.paths.contains(path)
            || path
                .canonicalize()
                .is_ok_and(|resolved| self.paths.contains(&resolved))
    }
}

/// Whether an entry with this name starts with the hidden marker.
/// Names that are not valid UTF-8 are checked too.
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(HIDDEN_PREFIX)
}

/// Lists every regular file under `root` that survives exclusion filtering.
///
/// Entries matched by `exclusions` and (with `hide_hidden`) dot-prefixed
/// entries are skipped, and skipped directories are never descended into. Symbolic links are
/// followed. Paths are absolute and sorted by name within each directory,
/// so the same tree always yields the same sequence.
pub fn list_files(
    root: &Path,
    exclusions: &ExclusionSet,
    hide_hidden: bool,
) -> Result<Vec<PathBuf>, SelectError> {
    if !root.exists() {
        return Err(SelectError::NotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(SelectError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let root = std::path::absolute(root).map_err(|e| SelectError::Resolve {
        path: root.to_path_buf(),
        source: e,
    })?;

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry, exclusions, hide_hidden));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| SelectError::Walk {
            path: root.clone(),
            source: e,
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "selected files");
    Ok(files)
}

fn is_skipped(entry: &DirEntry, exclusions: &ExclusionSet, hide_hidden: bool) -> bool {
    let name = entry.file_name();
    (hide_hidden && is_hidden(name))
        || exclusions.contains(name)
        || exclusions.contains_path(entry.path())
}

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("source directory not found: {path}")]
    NotFound { path: PathBuf },
    #[error("source path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
    #[error("failed to resolve source directory {path}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk source directory {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}
