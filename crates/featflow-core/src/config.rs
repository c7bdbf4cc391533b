use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Project settings from `.featflow.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Feature tree, relative to the project root.
    #[serde(default = "default_features_dir")]
    pub features_dir: PathBuf,
    /// Dashboard file name inside `features_dir`.
    #[serde(default = "default_dashboard")]
    pub dashboard: String,
    /// Statusline directory; `~/.claude/sessions` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_dir: Option<PathBuf>,
}

fn default_features_dir() -> PathBuf {
    PathBuf::from(paths::FEATURES_DIR)
}

fn default_dashboard() -> String {
    paths::DASHBOARD_FILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            features_dir: default_features_dir(),
            dashboard: default_dashboard(),
            sessions_dir: None,
        }
    }
}

impl Config {
    /// Load `.featflow.yaml`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Features dir as a `/`-joined string, for matching tool paths.
    /// A leading `./` is dropped so `./docs/features` matches `docs/features`.
    pub fn features_dir_str(&self) -> String {
        self.features_dir
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.features_dir.is_absolute() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "features_dir '{}' must be relative to the project root",
                    self.features_dir.display()
                ),
            });
        }

        if self
            .features_dir
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "features_dir '{}' must not contain '..'; editor hooks cannot match it",
                    self.features_dir.display()
                ),
            });
        }

        if self.dashboard.contains('/') || self.dashboard.contains('\\') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "dashboard '{}' must be a file name, not a path",
                    self.dashboard
                ),
            });
        } else if !self.dashboard.ends_with(".md") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("dashboard '{}' is not a markdown file", self.dashboard),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
