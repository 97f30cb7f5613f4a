use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name zipdeploy looks for in the project directory.
pub const CONFIG_FILE_NAME: &str = "zipdeploy.toml";

/// zipdeploy.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZipdeployConfig {
    #[serde(default)]
    pub function: FunctionConfig,
    #[serde(default)]
    pub package: PackageConfig,
    #[serde(default)]
    pub aws: AwsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Lambda function name
    pub name: Option<String>,
    /// S3 bucket the archive is uploaded to
    pub bucket: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Source root, relative to the project directory
    #[serde(default = "default_source")]
    pub source: PathBuf,
    /// Extra names to exclude, merged with the built-in defaults
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Dependency manifest installed into the package before zipping
    #[serde(default)]
    pub requirements: Option<PathBuf>,
    /// Package dot-prefixed files and directories too
    #[serde(default)]
    pub include_hidden: bool,
    /// Installer program invoked as `<installer> install -r <file> --target <dir>`
    #[serde(default = "default_installer")]
    pub installer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Named profile passed to the aws CLI
    pub profile: Option<String>,
    /// Region passed to the aws CLI
    pub region: Option<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            exclude: Vec::new(),
            requirements: None,
            include_hidden: false,
            installer: default_installer(),
        }
    }
}

impl PackageConfig {
    /// Source root resolved against the project directory.
    pub fn source_root(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.source)
    }

    /// Requirements manifest resolved against the project directory.
    pub fn requirements_path(&self, project_dir: &Path) -> Option<PathBuf> {
        self.requirements.as_ref().map(|p| project_dir.join(p))
    }
}

impl ZipdeployConfig {
    /// Load from zipdeploy.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            let config: Self = toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path.clone(),
                source: e,
            })?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Write this config as a new zipdeploy.toml. Never overwrites.
    pub fn write_new(&self, project_dir: &Path) -> crate::Result<PathBuf> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Err(crate::Error::ConfigExists(config_path));
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::ConfigSerialize { source: e })?;
        std::fs::write(&config_path, content).map_err(|e| crate::Error::ConfigWrite {
            path: config_path.clone(),
            source: e,
        })?;

        Ok(config_path)
    }
}

fn default_source() -> PathBuf {
    PathBuf::from(".")
}

fn default_installer() -> String {
    "pip".to_owned()
}
