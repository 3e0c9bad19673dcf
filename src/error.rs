//! Error types for the CLI

use std::path::PathBuf;

/// CLI Result type
pub type Result<T> = std::result::Result<T, Error>;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Stack(#[from] stack_common::Error),

    #[error("cannot read stack file {}: {source}", path.display())]
    StackFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "{} service(s) or endpoint(s) failed to compile:\n{}",
        failures.len(),
        failures.join("\n")
    )]
    Compile { failures: Vec<String> },
}

impl Error {
    pub fn stack_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::StackFile {
            path: path.into(),
            source,
        }
    }
}
