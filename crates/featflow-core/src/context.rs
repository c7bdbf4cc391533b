use crate::frontmatter::{self, Frontmatter, FrontmatterValue};
use crate::paths::{IDEA_FILE, PLAN_FILE, SHIPPED_FILE};
use crate::status::{self, FeatureStatus, FileProbe};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// FeatureContext
// ---------------------------------------------------------------------------

/// Snapshot of one feature directory, rebuilt from disk on every read.
///
/// `id` is always the directory name, never a frontmatter value, so it
/// matches the feature's location on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContext {
    pub id: String,
    pub dir: PathBuf,
    pub status: FeatureStatus,

    // idea.md
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    pub effort: String,
    pub impact: String,
    pub created: Option<NaiveDate>,
    pub depends_on: Vec<String>,
    pub blocked_by: Vec<String>,

    // plan.md
    pub started: Option<NaiveDate>,

    // shipped.md
    pub shipped: Option<NaiveDate>,
}

impl FeatureContext {
    /// Build a context from `dir`, or `None` if it holds no `idea.md`.
    ///
    /// Never fails: unreadable optional files, malformed frontmatter and bad
    /// dates all degrade to empty values.
    pub fn from_dir(dir: &Path) -> Option<Self> {
        let status = status::derive(dir)?;
        let id = dir_name(dir)?;

        let idea = frontmatter::parse_file(&dir.join(IDEA_FILE));
        let plan = optional_frontmatter(dir, PLAN_FILE);
        let shipped = optional_frontmatter(dir, SHIPPED_FILE);

        let name = match text(&idea, "name") {
            n if n.is_empty() => id.clone(),
            n => n,
        };

        Some(Self {
            status,
            name,
            kind: text(&idea, "type"),
            priority: text(&idea, "priority"),
            effort: text(&idea, "effort"),
            impact: text(&idea, "impact"),
            created: date(&idea, "created"),
            depends_on: string_list(&idea, "dependsOn"),
            blocked_by: string_list(&idea, "blockedBy"),
            started: date(&plan, "started"),
            shipped: date(&shipped, "shipped"),
            dir: dir.to_path_buf(),
            id,
        })
    }

    /// Dependencies that are missing from `all` or not yet completed.
    ///
    /// Follows `depends_on` order and keeps duplicates. Only direct
    /// dependencies are checked.
    pub fn unmet_dependencies(&self, all: &HashMap<String, FeatureContext>) -> Vec<String> {
        self.depends_on
            .iter()
            .filter(|dep| {
                all.get(dep.as_str())
                    .map(|f| f.status != FeatureStatus::Completed)
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }

    pub fn is_blocked(&self) -> bool {
        !self.blocked_by.is_empty()
    }
}

/// The directory's own name. Paths ending in `..` are resolved first, so
/// `feat/sub/..` names `feat`; a symlinked directory keeps its link name.
fn dir_name(dir: &Path) -> Option<String> {
    let name = match dir.file_name() {
        Some(name) => name.to_os_string(),
        None => {
            let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
            resolved.file_name()?.to_os_string()
        }
    };
    Some(name.to_string_lossy().into_owned())
}

fn optional_frontmatter(dir: &Path, file: &str) -> Frontmatter {
    if dir.has_file(file) {
        frontmatter::parse_file(&dir.join(file))
    } else {
        Frontmatter::new()
    }
}

fn text(fm: &Frontmatter, key: &str) -> String {
    match fm.get(key) {
        Some(FrontmatterValue::Scalar(s)) => s.clone(),
        Some(FrontmatterValue::List(items)) => items.join(", "),
        None => String::new(),
    }
}

fn date(fm: &Frontmatter, key: &str) -> Option<NaiveDate> {
    let raw = fm.get(key)?.as_scalar()?.trim();
    // chrono accepts unpadded fields; ISO calendar dates are exactly 10 chars.
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// A bare string is a one-element list (older files wrote `dependsOn: x`).
fn string_list(fm: &Frontmatter, key: &str) -> Vec<String> {
    match fm.get(key) {
        Some(FrontmatterValue::List(items)) => items.clone(),
        Some(FrontmatterValue::Scalar(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const IDEA: &str = "---
id: test-feature
name: Test Feature
type: Feature
priority: P1
effort: Medium
impact: High
created: 2024-01-15
---

# Test Feature

## Problem Statement
This is a test feature for unit testing.
";

    const PLAN: &str = "---\nstarted: 2024-01-20\n---\n\n# Implementation Plan: Test Feature\n";
    const SHIPPED: &str = "---\nshipped: 2024-01-25\n---\n\n# Shipped: Test Feature\n";

    fn feature_dir(tmp: &TempDir, id: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = tmp.path().join("docs/features").join(id);
        std::fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
        dir
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stub(id: &str, status: FeatureStatus, depends_on: &[&str]) -> FeatureContext {
        FeatureContext {
            id: id.to_string(),
            dir: PathBuf::from(id),
            status,
            name: id.to_string(),
            kind: String::new(),
            priority: String::new(),
            effort: String::new(),
            impact: String::new(),
            created: None,
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            blocked_by: Vec::new(),
            started: None,
            shipped: None,
        }
    }

    #[test]
    fn backlog_feature() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(&tmp, "test-feature", &[("idea.md", IDEA)]);

        let ctx = FeatureContext::from_dir(&dir).unwrap();
        assert_eq!(ctx.id, "test-feature");
        assert_eq!(ctx.status, FeatureStatus::Backlog);
        assert_eq!(ctx.name, "Test Feature");
        assert_eq!(ctx.kind, "Feature");
        assert_eq!(ctx.priority, "P1");
        assert_eq!(ctx.effort, "Medium");
        assert_eq!(ctx.impact, "High");
        assert_eq!(ctx.created, Some(ymd(2024, 1, 15)));
        assert!(ctx.started.is_none());
        assert!(ctx.shipped.is_none());
        assert!(ctx.depends_on.is_empty());
    }

    #[test]
    fn in_progress_feature() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(&tmp, "test-feature", &[("idea.md", IDEA), ("plan.md", PLAN)]);

        let ctx = FeatureContext::from_dir(&dir).unwrap();
        assert_eq!(ctx.status, FeatureStatus::InProgress);
        assert_eq!(ctx.started, Some(ymd(2024, 1, 20)));
        assert!(ctx.shipped.is_none());
    }

    #[test]
    fn completed_feature() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(
            &tmp,
            "test-feature",
            &[("idea.md", IDEA), ("plan.md", PLAN), ("shipped.md", SHIPPED)],
        );

        let ctx = FeatureContext::from_dir(&dir).unwrap();
        assert_eq!(ctx.status, FeatureStatus::Completed);
        assert_eq!(ctx.started, Some(ymd(2024, 1, 20)));
        assert_eq!(ctx.shipped, Some(ymd(2024, 1, 25)));
    }

    #[test]
    fn missing_idea_is_not_a_feature() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(
            &tmp,
            "no-idea",
            &[("plan.md", "Some plan"), ("shipped.md", SHIPPED)],
        );
        assert!(FeatureContext::from_dir(&dir).is_none());

        let empty = feature_dir(&tmp, "empty", &[]);
        assert!(FeatureContext::from_dir(&empty).is_none());
    }

    #[test]
    fn status_follows_files_between_builds() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(&tmp, "moving", &[("idea.md", IDEA)]);
        assert_eq!(
            FeatureContext::from_dir(&dir).unwrap().status,
            FeatureStatus::Backlog
        );

        std::fs::write(dir.join("plan.md"), PLAN).unwrap();
        assert_eq!(
            FeatureContext::from_dir(&dir).unwrap().status,
            FeatureStatus::InProgress
        );

        std::fs::remove_file(dir.join("plan.md")).unwrap();
        assert_eq!(
            FeatureContext::from_dir(&dir).unwrap().status,
            FeatureStatus::Backlog
        );
    }

    #[test]
    fn fallback_name_is_directory_name() {
        let tmp = TempDir::new().unwrap();
        let missing = feature_dir(&tmp, "unnamed-feature", &[("idea.md", "---\npriority: P1\n---\n")]);
        assert_eq!(FeatureContext::from_dir(&missing).unwrap().name, "unnamed-feature");

        let empty = feature_dir(&tmp, "blank-name", &[("idea.md", "---\nname:\n---\n")]);
        assert_eq!(FeatureContext::from_dir(&empty).unwrap().name, "blank-name");
    }

    #[test]
    fn id_resolves_relative_components() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(&tmp, "feat", &[("idea.md", IDEA)]);
        std::fs::create_dir_all(dir.join("sub")).unwrap();

        let ctx = FeatureContext::from_dir(&dir.join("sub/..")).unwrap();
        assert_eq!(ctx.id, "feat");
        assert_eq!(ctx.status, FeatureStatus::Backlog);

        let ctx = FeatureContext::from_dir(&dir.join(".")).unwrap();
        assert_eq!(ctx.id, "feat");
    }

    #[test]
    fn directory_named_like_a_feature_file_counts() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(&tmp, "odd", &[("idea.md", IDEA)]);
        std::fs::create_dir_all(dir.join("plan.md")).unwrap();

        let ctx = FeatureContext::from_dir(&dir).unwrap();
        assert_eq!(ctx.status, FeatureStatus::InProgress);
        assert_eq!(ctx.started, None);
    }

    #[test]
    fn id_comes_from_directory_not_frontmatter() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(&tmp, "real-id", &[("idea.md", "---\nid: other-id\n---\n")]);
        assert_eq!(FeatureContext::from_dir(&dir).unwrap().id, "real-id");
    }

    #[test]
    fn invalid_dates_become_none() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(
            &tmp,
            "bad-date",
            &[
                ("idea.md", "---\nname: Bad Date Feature\ncreated: not-a-date\n---\n"),
                ("plan.md", "---\nstarted: 2024-1-5\n---\n"),
            ],
        );
        let ctx = FeatureContext::from_dir(&dir).unwrap();
        assert_eq!(ctx.name, "Bad Date Feature");
        assert!(ctx.created.is_none());
        assert!(ctx.started.is_none());
    }

    #[test]
    fn plan_without_frontmatter_still_in_progress() {
        let tmp = TempDir::new().unwrap();
        let dir = feature_dir(&tmp, "loose-plan", &[("idea.md", IDEA), ("plan.md", "# Plan\n")]);
        let ctx = FeatureContext::from_dir(&dir).unwrap();
        assert_eq!(ctx.status, FeatureStatus::InProgress);
        assert!(ctx.started.is_none());
    }

    #[test]
    fn dependency_fields_normalize() {
        let tmp = TempDir::new().unwrap();
        let legacy = feature_dir(
            &tmp,
            "legacy",
            &[("idea.md", "---\ndependsOn: feature-a\nblockedBy: [x, y]\n---\n")],
        );
        let ctx = FeatureContext::from_dir(&legacy).unwrap();
        assert_eq!(ctx.depends_on, vec!["feature-a".to_string()]);
        assert_eq!(ctx.blocked_by, vec!["x".to_string(), "y".to_string()]);
        assert!(ctx.is_blocked());

        let blank = feature_dir(&tmp, "blank", &[("idea.md", "---\ndependsOn:\n---\n")]);
        assert!(FeatureContext::from_dir(&blank).unwrap().depends_on.is_empty());
    }

    #[test]
    fn unmet_dependencies_checks_one_level() {
        let a = stub("A", FeatureStatus::Backlog, &["B", "C"]);
        let all: HashMap<String, FeatureContext> = [
            a.clone(),
            stub("B", FeatureStatus::Completed, &[]),
            stub("C", FeatureStatus::Backlog, &["D"]),
        ]
        .into_iter()
        .map(|f| (f.id.clone(), f))
        .collect();

        assert_eq!(a.unmet_dependencies(&all), vec!["C".to_string()]);
    }

    #[test]
    fn unmet_dependencies_keeps_order_and_duplicates() {
        let a = stub("A", FeatureStatus::InProgress, &["missing", "B", "missing"]);
        let all: HashMap<String, FeatureContext> =
            [("B".to_string(), stub("B", FeatureStatus::InProgress, &[]))]
                .into_iter()
                .collect();

        assert_eq!(
            a.unmet_dependencies(&all),
            vec!["missing".to_string(), "B".to_string(), "missing".to_string()]
        );
    }
}
