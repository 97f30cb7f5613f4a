//! Core types and configuration for zipdeploy.
//!
//! This crate defines the `zipdeploy.toml` schema ([`ZipdeployConfig`]),
//! the [`DeploymentTarget`] a package is shipped to, and shared error types.

pub mod config;
pub mod error;
pub mod target;

pub use config::{AwsConfig, FunctionConfig, PackageConfig, ZipdeployConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use target::{DeploymentTarget, archive_path_for_function};
