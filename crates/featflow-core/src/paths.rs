use crate::config::Config;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const FEATURES_DIR: &str = "docs/features";
pub const DASHBOARD_FILE: &str = "DASHBOARD.md";
pub const CONFIG_FILE: &str = ".featflow.yaml";

pub const IDEA_FILE: &str = "idea.md";
pub const PLAN_FILE: &str = "plan.md";
pub const SHIPPED_FILE: &str = "shipped.md";

pub const CLAUDE_DIR: &str = ".claude";
pub const SESSIONS_DIR: &str = "sessions";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn features_dir(root: &Path, cfg: &Config) -> PathBuf {
    root.join(&cfg.features_dir)
}

pub fn feature_dir(root: &Path, cfg: &Config, id: &str) -> PathBuf {
    features_dir(root, cfg).join(id)
}

pub fn dashboard_path(root: &Path, cfg: &Config) -> PathBuf {
    features_dir(root, cfg).join(&cfg.dashboard)
}

/// `~/.claude/sessions` unless the config overrides it.
pub fn sessions_dir(cfg: &Config) -> Option<PathBuf> {
    if let Some(dir) = &cfg.sessions_dir {
        return Some(dir.clone());
    }
    let home = home::home_dir()?;
    Some(home.join(CLAUDE_DIR).join(SESSIONS_DIR))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
