//! Package a source directory into a zip and deploy it to AWS Lambda.
//!
//! This is the facade crate: it runs the whole pipeline and re-exports the
//! zipdeploy sub-crates.
//!
//! | Module | Crate | Description |
//! |--------|-------|-------------|
//! | root | [`zipdeploy-core`](https://crates.io/crates/zipdeploy-core) | Configuration and shared types |
//! | [`build`] | [`zipdeploy-build`](https://crates.io/crates/zipdeploy-build) | File selection and zip packaging |
//! | [`cloud`] | [`zipdeploy-cloud`](https://crates.io/crates/zipdeploy-cloud) | S3 upload and Lambda update |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use zipdeploy::{DeployOptions, DeploymentTarget, deploy};
//! use zipdeploy::build::PipInstaller;
//! use zipdeploy::cloud::AwsClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let target = DeploymentTarget::new("my-func", "my-bucket")?;
//! let client = AwsClient::default();
//! let outcome = deploy(
//!     &target,
//!     &DeployOptions::default(),
//!     &PipInstaller::default(),
//!     &client,
//!     &client,
//! )
//! .await?;
//! println!("published version {}", outcome.function.version);
//! # Ok(())
//! # }
//! ```

pub mod deploy;
pub mod error;
pub mod progress;

pub use deploy::{DeployOptions, DeployOutcome, deploy, deploy_with_progress, package};
pub use error::{Error, Phase, Result};
pub use progress::Progress;

// Core types flattened into root namespace for convenience.
pub use zipdeploy_core::{
    AwsConfig, CONFIG_FILE_NAME, DeploymentTarget, FunctionConfig, PackageConfig, ZipdeployConfig,
};

/// File selection, dependency installation, and zip packaging.
///
/// See [`zipdeploy-build`](https://crates.io/crates/zipdeploy-build) for details.
pub mod build {
    pub use zipdeploy_build::*;
}

/// S3 upload and Lambda code update operations.
///
/// See [`zipdeploy-cloud`](https://crates.io/crates/zipdeploy-cloud) for details.
pub mod cloud {
    pub use zipdeploy_cloud::*;
}
