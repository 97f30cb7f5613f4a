use crate::PackageArgs;
use std::path::PathBuf;
use zipdeploy::ZipdeployConfig;
use zipdeploy::build::PipInstaller;

/// Build the archive without uploading it.
pub fn package(args: &PackageArgs) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = ZipdeployConfig::load(&project_dir)?;
    let function_name = super::function_name(args, &config)?;
    let options = super::package_options(args, &config, &project_dir);

    let installer = PipInstaller::new(config.package.installer.as_str());
    let archive = zipdeploy::package(&function_name, &options, &installer)?;

    println!(
        "Packaged {count} files into {path}",
        count = archive.members.len(),
        path = archive.path.display(),
    );
    Ok(())
}
