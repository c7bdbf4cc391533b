use crate::context::FeatureContext;
use crate::error::Result;
use crate::status::FeatureStatus;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Build a context for every feature directory under `features_dir`.
///
/// Plain files and directories without `idea.md` are skipped. A missing
/// `features_dir` is an empty project, not an error. Sorted by id.
pub fn scan(features_dir: &Path) -> Result<Vec<FeatureContext>> {
    if !features_dir.exists() {
        return Ok(Vec::new());
    }

    let mut features = Vec::new();
    for entry in std::fs::read_dir(features_dir)? {
        let path = entry?.path();
        // Follows symlinks, so linked feature directories are scanned too.
        if !path.is_dir() {
            continue;
        }
        match FeatureContext::from_dir(&path) {
            Some(ctx) => features.push(ctx),
            None => tracing::debug!(dir = %path.display(), "skipping directory without idea.md"),
        }
    }
    features.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(features)
}

/// Key features by id for dependency lookups.
pub fn index(features: &[FeatureContext]) -> HashMap<String, FeatureContext> {
    features
        .iter()
        .map(|f| (f.id.clone(), f.clone()))
        .collect()
}

/// Feature counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub backlog: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn of(features: &[FeatureContext]) -> Self {
        let mut counts = Self::default();
        for f in features {
            match f.status {
                FeatureStatus::Backlog => counts.backlog += 1,
                FeatureStatus::InProgress => counts.in_progress += 1,
                FeatureStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: FeatureStatus) -> usize {
        match status {
            FeatureStatus::Backlog => self.backlog,
            FeatureStatus::InProgress => self.in_progress,
            FeatureStatus::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.backlog + self.in_progress + self.completed
    }
}
