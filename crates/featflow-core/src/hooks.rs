//! Editor tool-use hooks: guard the generated dashboard and spot writes to
//! feature files so the dashboard can be regenerated.

use crate::config::Config;
use crate::error::Result;
use crate::paths::{IDEA_FILE, PLAN_FILE, SHIPPED_FILE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// HookInput
// ---------------------------------------------------------------------------

/// The JSON envelope the editor sends on stdin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: ToolInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: String,
}

impl HookInput {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn file_path(&self) -> Option<&str> {
        let path = self.tool_input.file_path.as_str();
        if path.is_empty() {
            None
        } else {
            Some(path)
        }
    }

    pub fn is_file_write(&self) -> bool {
        matches!(self.tool_name.as_str(), "Write" | "Edit")
    }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookVerdict {
    Allow,
    Block,
}

/// Writes to the generated dashboard are blocked; everything else passes.
pub fn pre_tool_use(input: &HookInput, cfg: &Config) -> HookVerdict {
    match input.file_path() {
        Some(path) if is_dashboard_path(path, cfg) => HookVerdict::Block,
        _ => HookVerdict::Allow,
    }
}

/// The feature file touched by a `Write`/`Edit`, if any.
pub fn post_tool_use(input: &HookInput, cfg: &Config) -> Option<FeatureFileChange> {
    if !input.is_file_write() {
        return None;
    }
    feature_file_change(input.file_path()?, cfg)
}

pub fn blocked_message(cfg: &Config) -> String {
    let rule = "=".repeat(67);
    let dir = cfg.features_dir_str();
    let dashboard = &cfg.dashboard;
    format!(
        "\n{rule}\n  BLOCKED: Direct write to {dashboard} is not allowed\n{rule}\n\n\
         \x20 {dashboard} is auto-generated from feature directories.\n\n\
         \x20 To update the dashboard, write to feature directories instead:\n\n\
         \x20 Add to backlog:    Write {dir}/[id]/{IDEA_FILE}\n\
         \x20 Start work:        Write {dir}/[id]/{PLAN_FILE}\n\
         \x20 Complete feature:  Write {dir}/[id]/{SHIPPED_FILE}\n\n\
         \x20 The hook will automatically regenerate {dashboard}.\n\n{rule}\n"
    )
}

// ---------------------------------------------------------------------------
// Path classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFileKind {
    Idea,
    Plan,
    Shipped,
}

impl FeatureFileKind {
    pub fn filename(self) -> &'static str {
        match self {
            FeatureFileKind::Idea => IDEA_FILE,
            FeatureFileKind::Plan => PLAN_FILE,
            FeatureFileKind::Shipped => SHIPPED_FILE,
        }
    }
}

impl fmt::Display for FeatureFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFileChange {
    pub feature_id: String,
    pub kind: FeatureFileKind,
    /// Text before `/<features_dir>/`; `None` when the path starts there.
    pub project_root: Option<PathBuf>,
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

pub fn is_dashboard_path(path: &str, cfg: &Config) -> bool {
    let path = normalize(path);
    let target = format!("{}/{}", cfg.features_dir_str(), cfg.dashboard);
    path == target || path.ends_with(&format!("/{target}"))
}

pub fn feature_file_change(path: &str, cfg: &Config) -> Option<FeatureFileChange> {
    let path = normalize(path);
    let dir = regex::escape(&cfg.features_dir_str());
    let re = Regex::new(&format!(r"(?:^|/){dir}/([^/]+)/(idea|plan|shipped)\.md$")).ok()?;
    let caps = re.captures(&path)?;

    let kind = match &caps[2] {
        "idea" => FeatureFileKind::Idea,
        "plan" => FeatureFileKind::Plan,
        _ => FeatureFileKind::Shipped,
    };
    let prefix = &path[..caps.get(0)?.start()];
    let project_root = if prefix.is_empty() {
        None
    } else {
        Some(PathBuf::from(prefix))
    };

    Some(FeatureFileChange {
        feature_id: caps[1].to_string(),
        kind,
        project_root,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
