mod deploy;
mod doctor;
mod init;
mod package;

use crate::PackageArgs;
use std::path::Path;
use zipdeploy::{DeployOptions, ZipdeployConfig};

pub use deploy::deploy;
pub use doctor::doctor;
pub use init::init;
pub use package::package;

/// Function name from `--function`, falling back to `[function].name`.
pub(crate) fn function_name(args: &PackageArgs, config: &ZipdeployConfig) -> anyhow::Result<String> {
    args.function
        .clone()
        .or_else(|| config.function.name.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("function name not set — pass --function or set [function].name in zipdeploy.toml")
        })
}

/// Package options from zipdeploy.toml with command-line overrides applied.
pub(crate) fn package_options(
    args: &PackageArgs,
    config: &ZipdeployConfig,
    project_dir: &Path,
) -> DeployOptions {
    let mut options = DeployOptions::from_config(&config.package, project_dir);
    if let Some(source) = &args.source {
        options.source_root = project_dir.join(source);
    }
    options.exclude.extend(args.exclude.iter().cloned());
    if let Some(requirements) = &args.requirements {
        options.requirements = Some(project_dir.join(requirements));
    }
    options.include_hidden |= args.include_hidden;
    options
}
