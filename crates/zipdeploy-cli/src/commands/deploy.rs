use crate::PackageArgs;
use std::path::PathBuf;
use zipdeploy::build::PipInstaller;
use zipdeploy::cloud::AwsClient;
use zipdeploy::{DeploymentTarget, ZipdeployConfig};

/// Execute the full deploy pipeline.
pub async fn deploy(args: &PackageArgs, bucket: Option<String>, quiet: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");

    // Load configuration
    let config = ZipdeployConfig::load(&project_dir)?;
    let function_name = super::function_name(args, &config)?;
    let bucket = bucket.or_else(|| config.function.bucket.clone()).ok_or_else(|| {
        anyhow::anyhow!("bucket not set — pass --bucket or set [function].bucket in zipdeploy.toml")
    })?;
    let target = DeploymentTarget::new(function_name, bucket)?;

    let mut options = super::package_options(args, &config, &project_dir);
    options.verbose = !quiet;

    let installer = PipInstaller::new(config.package.installer.as_str());
    let client = AwsClient::new(config.aws.profile.clone(), config.aws.region.clone());

    let outcome = zipdeploy::deploy(&target, &options, &installer, &client, &client).await?;

    println!();
    println!(
        "Deployed: {function} version {version} ({arn})",
        function = target.function_name(),
        version = outcome.function.version,
        arn = outcome.function.function_arn,
    );

    Ok(())
}
