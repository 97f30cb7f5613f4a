use std::io::Write;
use std::path::{Path, PathBuf};

use zipdeploy_build::{BuiltArchive, DependencyInstaller, ExclusionSet, PackageSpec, build_archive};
use zipdeploy_cloud::publish::{update_code, upload};
use zipdeploy_cloud::{FunctionManager, FunctionVersion, ObjectStorage};
use zipdeploy_core::{DeploymentTarget, PackageConfig, archive_path_for_function};

use crate::error::Result;
use crate::progress::Progress;

/// What to package and how loudly.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub source_root: PathBuf,
    /// Merged with the built-in default exclusions.
    pub exclude: Vec<String>,
    pub requirements: Option<PathBuf>,
    pub include_hidden: bool,
    pub verbose: bool,
    /// Parent for the staging directory; the system temp dir when `None`.
    pub staging_dir: Option<PathBuf>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            exclude: Vec::new(),
            requirements: None,
            include_hidden: false,
            verbose: true,
            staging_dir: None,
        }
    }
}

impl DeployOptions {
    /// Options from the `[package]` section, paths resolved against `project_dir`.
    pub fn from_config(config: &PackageConfig, project_dir: &Path) -> Self {
        Self {
            source_root: config.source_root(project_dir),
            exclude: config.exclude.clone(),
            requirements: config.requirements_path(project_dir),
            include_hidden: config.include_hidden,
            ..Self::default()
        }
    }

    fn package_spec(&self, destination: PathBuf) -> PackageSpec {
        PackageSpec {
            source_root: self.source_root.clone(),
            exclusions: ExclusionSet::with_extra(self.exclude.iter().cloned()),
            hide_hidden: !self.include_hidden,
            requirements: self.requirements.clone(),
            destination,
            staging_parent: self.staging_dir.clone(),
        }
    }
}

/// Result of a full deploy.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub archive: BuiltArchive,
    pub key: String,
    pub function: FunctionVersion,
}

/// Build `<temp>/<function_name>.zip` from the configured sources.
pub fn package<I: DependencyInstaller + ?Sized>(
    function_name: &str,
    options: &DeployOptions,
    installer: &I,
) -> Result<BuiltArchive> {
    let destination = archive_path_for_function(function_name)?;
    let spec = options.package_spec(destination);
    Ok(build_archive(&spec, installer)?)
}

/// Package, upload, and publish, printing progress to stdout when verbose.
///
/// Callers must not run two deploys for the same function name at once:
/// both would write the same archive path.
pub async fn deploy<I, S, F>(
    target: &DeploymentTarget,
    options: &DeployOptions,
    installer: &I,
    storage: &S,
    functions: &F,
) -> Result<DeployOutcome>
where
    I: DependencyInstaller + ?Sized,
    S: ObjectStorage,
    F: FunctionManager,
{
    let mut progress = Progress::stdout(options.verbose);
    deploy_with_progress(target, options, installer, storage, functions, &mut progress).await
}

/// [`deploy`] with progress lines sent to an arbitrary writer.
pub async fn deploy_with_progress<I, S, F, W>(
    target: &DeploymentTarget,
    options: &DeployOptions,
    installer: &I,
    storage: &S,
    functions: &F,
    progress: &mut Progress<W>,
) -> Result<DeployOutcome>
where
    I: DependencyInstaller + ?Sized,
    S: ObjectStorage,
    F: FunctionManager,
    W: Write,
{
    progress.begin("Zipping files");
    let spec = options.package_spec(target.archive_path());
    let archive = build_archive(&spec, installer)?;
    progress.done();

    progress.begin("Sending zip to s3");
    let key = upload(target, &archive.path, storage).await?;
    progress.done();

    progress.begin("Updating lambda code");
    let function = update_code(target, &key, functions).await?;
    progress.done();

    Ok(DeployOutcome {
        archive,
        key,
        function,
    })
}
