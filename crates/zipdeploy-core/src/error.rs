use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write config to {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config")]
    ConfigSerialize { source: toml::ser::Error },

    #[error("config already exists at {0} — edit it directly or delete it to re-init")]
    ConfigExists(PathBuf),

    // ── Deployment target ──
    #[error("function name is empty — pass --function or set [function].name")]
    MissingFunctionName,

    #[error("bucket name is empty — pass --bucket or set [function].bucket")]
    MissingBucketName,

    #[error("invalid function name {name:?}: {reason}")]
    InvalidFunctionName { name: String, reason: &'static str },
}
