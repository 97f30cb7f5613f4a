mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "zipdeploy",
    about = "Package a source directory and deploy it to AWS Lambda"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Zip the sources, upload to S3, and publish a new Lambda version
    Deploy {
        #[command(flatten)]
        package: PackageArgs,
        /// S3 bucket the archive is uploaded to
        #[arg(long, short = 'b')]
        bucket: Option<String>,
        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },
    /// Build the zip archive only
    Package {
        #[command(flatten)]
        package: PackageArgs,
    },
    /// Create a zipdeploy.toml in the current directory
    Init {
        /// Lambda function name
        #[arg(long, short = 'f')]
        function: Option<String>,
        /// S3 bucket name
        #[arg(long, short = 'b')]
        bucket: Option<String>,
    },
    /// Check aws CLI, credentials, and installer setup
    Doctor,
}

/// Packaging flags shared by `deploy` and `package`. Each overrides the
/// matching zipdeploy.toml value.
#[derive(Args)]
pub(crate) struct PackageArgs {
    /// Lambda function name
    #[arg(long, short = 'f')]
    pub function: Option<String>,
    /// Source directory to package
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,
    /// Extra names to exclude (repeatable)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,
    /// Dependency manifest installed into the package
    #[arg(long, short = 'r')]
    pub requirements: Option<PathBuf>,
    /// Include dot-prefixed files and directories
    #[arg(long)]
    pub include_hidden: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // AWS_PROFILE / AWS_REGION / credentials for the aws subprocess
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        // arch-lint: allow(no-error-swallowing) reason="a project without .env is the common case"
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy {
            package,
            bucket,
            quiet,
        } => commands::deploy(&package, bucket, quiet).await?,
        Commands::Package { package } => commands::package(&package)?,
        Commands::Init { function, bucket } => commands::init(function, bucket)?,
        Commands::Doctor => commands::doctor().await?,
    }

    Ok(())
}
