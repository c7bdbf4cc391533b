use crate::error::FeatflowError;
use crate::paths::{IDEA_FILE, PLAN_FILE, SHIPPED_FILE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// FeatureStatus
// ---------------------------------------------------------------------------

/// Lifecycle stage, derived from which markdown files exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Backlog,
    InProgress,
    Completed,
}

impl FeatureStatus {
    pub fn all() -> &'static [FeatureStatus] {
        &[
            FeatureStatus::Backlog,
            FeatureStatus::InProgress,
            FeatureStatus::Completed,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureStatus::Backlog => "backlog",
            FeatureStatus::InProgress => "in_progress",
            FeatureStatus::Completed => "completed",
        }
    }

    /// Human heading used on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            FeatureStatus::Backlog => "Backlog",
            FeatureStatus::InProgress => "In Progress",
            FeatureStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureStatus {
    type Err = FeatflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(FeatureStatus::Backlog),
            "in_progress" | "in-progress" => Ok(FeatureStatus::InProgress),
            "completed" => Ok(FeatureStatus::Completed),
            _ => Err(FeatflowError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FileProbe
// ---------------------------------------------------------------------------

/// Answers "does entry `name` exist here". Status derivation only needs this.
pub trait FileProbe {
    fn has_file(&self, name: &str) -> bool;
}

/// Any entry counts, not only regular files.
impl FileProbe for Path {
    fn has_file(&self, name: &str) -> bool {
        self.join(name).exists()
    }
}

/// Derive the status from file presence. `None` when `idea.md` is missing.
///
/// `shipped.md` takes precedence over `plan.md`, so a feature shipped
/// without a plan still counts as completed.
pub fn derive<P: FileProbe + ?Sized>(probe: &P) -> Option<FeatureStatus> {
    if !probe.has_file(IDEA_FILE) {
        return None;
    }
    let status = if probe.has_file(SHIPPED_FILE) {
        FeatureStatus::Completed
    } else if probe.has_file(PLAN_FILE) {
        FeatureStatus::InProgress
    } else {
        FeatureStatus::Backlog
    };
    Some(status)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    struct Files(HashSet<&'static str>);

    impl FileProbe for Files {
        fn has_file(&self, name: &str) -> bool {
            self.0.contains(name)
        }
    }

    fn files(names: &[&'static str]) -> Files {
        Files(names.iter().copied().collect())
    }

    #[test]
    fn status_values() {
        assert_eq!(FeatureStatus::Backlog.as_str(), "backlog");
        assert_eq!(FeatureStatus::InProgress.as_str(), "in_progress");
        assert_eq!(FeatureStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn status_from_str() {
        assert_eq!(
            FeatureStatus::from_str("in-progress").unwrap(),
            FeatureStatus::InProgress
        );
        assert!(FeatureStatus::from_str("shipped").is_err());
    }

    #[test]
    fn status_is_ordered_by_lifecycle() {
        assert!(FeatureStatus::Backlog < FeatureStatus::InProgress);
        assert!(FeatureStatus::InProgress < FeatureStatus::Completed);
    }

    #[test]
    fn derive_from_file_presence() {
        assert_eq!(derive(&files(&["idea.md"])), Some(FeatureStatus::Backlog));
        assert_eq!(
            derive(&files(&["idea.md", "plan.md"])),
            Some(FeatureStatus::InProgress)
        );
        assert_eq!(
            derive(&files(&["idea.md", "plan.md", "shipped.md"])),
            Some(FeatureStatus::Completed)
        );
        assert_eq!(
            derive(&files(&["idea.md", "shipped.md"])),
            Some(FeatureStatus::Completed)
        );
    }

    #[test]
    fn derive_without_idea_is_none() {
        assert_eq!(derive(&files(&[])), None);
        assert_eq!(derive(&files(&["plan.md", "shipped.md"])), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&FeatureStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
