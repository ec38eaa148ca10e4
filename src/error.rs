use std::path::PathBuf;
use thiserror::Error;

/// Failures callers may want to tell apart. Everything else travels as
/// `anyhow::Error` with path context attached.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("input must be a JSON file or a folder of CSV exports: {0}")]
    InvalidInput(PathBuf),

    #[error("template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
