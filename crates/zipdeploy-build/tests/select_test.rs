use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;
use zipdeploy_build::select::is_hidden;
use zipdeploy_build::{ExclusionSet, SelectError, list_files};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_str().unwrap().to_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

// ── Selection rules ──

#[test]
fn skips_hidden_and_default_excludes() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "app.py", "print('hi')");
    write(root, ".hidden/ignored.txt", "secret");
    write(root, "__pycache__/cache.pyc", "bytecode");
    write(root, "lib/util.py", "def f(): pass");

    let files = list_files(root, &ExclusionSet::default(), true).unwrap();

    assert_eq!(relative_names(root, &files), vec!["app.py", "lib/util.py"]);
}

#[test]
fn caller_exclusions_prune_directories_at_any_depth() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "app.py", "");
    write(root, "tests/test_app.py", "");
    write(root, "lib/tests/test_util.py", "");
    write(root, "lib/util.py", "");

    let exclusions = ExclusionSet::with_extra(["tests"]);
    let files = list_files(root, &exclusions, true).unwrap();

    assert_eq!(relative_names(root, &files), vec!["app.py", "lib/util.py"]);
}

#[test]
fn caller_exclusions_match_file_names() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "app.py", "");
    write(root, "README.md", "");
    write(root, "docs/README.md", "");

    let exclusions = ExclusionSet::with_extra(["README.md"]);
    let files = list_files(root, &exclusions, true).unwrap();

    assert_eq!(relative_names(root, &files), vec!["app.py"]);
}

#[test]
fn hidden_entries_kept_when_not_hiding() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, ".env", "KEY=1");
    write(root, "app.py", "");
    write(root, "__pycache__/app.pyc", "");

    let files = list_files(root, &ExclusionSet::default(), false).unwrap();

    // Default excludes still apply
    assert_eq!(relative_names(root, &files), vec![".env", "app.py"]);
}

#[test]
fn packaging_metadata_excluded_by_default() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "setup.py", "");
    write(root, "setup.cfg", "");
    write(root, "MANIFEST.in", "");
    write(root, "handler.py", "");

    let files = list_files(root, &ExclusionSet::default(), true).unwrap();

    assert_eq!(relative_names(root, &files), vec!["handler.py"]);
}

#[test]
fn root_itself_is_walked_even_when_hidden() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join(".build");
    write(&root, "app.py", "");

    let files = list_files(&root, &ExclusionSet::default(), true).unwrap();

    assert_eq!(relative_names(&root, &files), vec!["app.py"]);
}

#[test]
fn results_are_absolute_regular_files_in_name_order() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "b.py", "");
    write(root, "a/z.py", "");
    write(root, "a/m.py", "");
    std::fs::create_dir_all(root.join("empty")).unwrap();

    let files = list_files(root, &ExclusionSet::default(), true).unwrap();

    assert_eq!(relative_names(root, &files), vec!["a/m.py", "a/z.py", "b.py"]);
    for file in &files {
        assert!(file.is_absolute());
        assert!(file.is_file());
    }
}

// ── Edge cases ──

#[test]
fn empty_directory_yields_empty_list() {
    let tmp = TempDir::new().unwrap();
    let files = list_files(tmp.path(), &ExclusionSet::default(), true).unwrap();
    assert!(files.is_empty());
}

#[test]
fn missing_root_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");

    let result = list_files(&missing, &ExclusionSet::default(), true);

    assert!(matches!(result, Err(SelectError::NotFound { ref path }) if *path == missing));
}

#[test]
fn file_root_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", "");

    let result = list_files(&tmp.path().join("app.py"), &ExclusionSet::default(), true);

    assert!(matches!(result, Err(SelectError::NotADirectory { .. })));
}

#[cfg(unix)]
#[test]
fn symlinked_files_are_followed() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("src");
    write(&root, "real.py", "x = 1");
    std::os::unix::fs::symlink(root.join("real.py"), root.join("link.py")).unwrap();

    let files = list_files(&root, &ExclusionSet::default(), true).unwrap();

    assert_eq!(relative_names(&root, &files), vec!["link.py", "real.py"]);
}

#[cfg(unix)]
#[test]
fn symlink_cycle_is_a_walk_error() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("src");
    write(&root, "pkg/mod.py", "");
    std::os::unix::fs::symlink(&root, root.join("pkg/loop")).unwrap();

    let result = list_files(&root, &ExclusionSet::default(), true);

    assert!(matches!(result, Err(SelectError::Walk { .. })));
}

// APFS rejects names that are not valid UTF-8
#[cfg(target_os = "linux")]
#[test]
fn non_utf8_hidden_names_are_skipped() {
    use std::os::unix::ffi::OsStrExt;

    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", "");
    let name = std::ffi::OsStr::from_bytes(b".secret\xff");
    std::fs::write(tmp.path().join(name), "token").unwrap();
    std::fs::create_dir(tmp.path().join(std::ffi::OsStr::from_bytes(b".cache\xfe"))).unwrap();

    let files = list_files(tmp.path(), &ExclusionSet::default(), true).unwrap();

    assert_eq!(relative_names(tmp.path(), &files), vec!["app.py"]);
}

#[test]
fn excluded_locations_are_pruned() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", "");
    write(tmp.path(), "out/build/stale.zip", "");
    write(tmp.path(), "out/keep.py", "");
    write(tmp.path(), "other/build/util.py", "");

    let mut exclusions = ExclusionSet::default();
    exclusions.exclude_path(tmp.path().join("out/build").canonicalize().unwrap());
    let files = list_files(tmp.path(), &exclusions, true).unwrap();

    assert_eq!(
        relative_names(tmp.path(), &files),
        vec!["app.py", "other/build/util.py", "out/keep.py"]
    );
}

#[test]
fn excluded_location_need_not_exist() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", "");

    let mut exclusions = ExclusionSet::default();
    exclusions.exclude_path(tmp.path().join("myfunc.zip"));

    assert!(exclusions.contains_path(&tmp.path().join("myfunc.zip")));
    let files = list_files(tmp.path(), &exclusions, true).unwrap();
    assert_eq!(relative_names(tmp.path(), &files), vec!["app.py"]);
}

// ── Properties ──

const DIR_NAMES: &[&str] = &["a", "b", ".hid", "__pycache__", "skip"];
const FILE_NAMES: &[&str] = &["x.py", ".dot.py", "skip.py", "setup.py", "y.txt"];

fn tree_strategy() -> impl Strategy<Value = Vec<String>> {
    let dirs = prop::collection::vec(prop::sample::select(DIR_NAMES), 0..4);
    let leaf = prop::sample::select(FILE_NAMES);
    prop::collection::vec((dirs, leaf), 0..16).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(dirs, leaf)| {
                let mut parts: Vec<&str> = dirs;
                parts.push(leaf);
                parts.join("/")
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn selection_matches_exclusion_rules(paths in tree_strategy(), hide_hidden in any::<bool>()) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for p in &paths {
            write(root, p, p);
        }

        let exclusions = ExclusionSet::with_extra(["skip", "skip.py"]);
        let files = list_files(root, &exclusions, hide_hidden).unwrap();
        let selected: BTreeSet<String> = relative_names(root, &files).into_iter().collect();

        let expected: BTreeSet<String> = paths
            .iter()
            .filter(|p| {
                p.split('/').all(|segment| {
                    let name = std::ffi::OsStr::new(segment);
                    !(hide_hidden && is_hidden(name)) && !exclusions.contains(name)
                })
            })
            .cloned()
            .collect();

        prop_assert_eq!(&selected, &expected);
        prop_assert_eq!(selected.len(), files.len());
        for file in &files {
            prop_assert!(file.is_file());
        }
    }
}
