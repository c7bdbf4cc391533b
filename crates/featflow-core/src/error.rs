use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatflowError {
    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("feature directory not found: {}", .0.display())]
    FeatureDirNotFound(PathBuf),

    #[error("idea.md not found for '{0}': not a valid feature")]
    NotAFeature(String),

    #[error("invalid status '{0}': expected backlog, in_progress or completed")]
    InvalidStatus(String),

    #[error("feature already shipped: {} exists", .0.display())]
    AlreadyShipped(PathBuf),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FeatflowError>;
