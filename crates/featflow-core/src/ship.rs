use crate::config::Config;
use crate::context::FeatureContext;
use crate::error::{FeatflowError, Result};
use crate::paths::{self, IDEA_FILE, SHIPPED_FILE};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SUMMARY: &str = "Feature completed";

#[derive(Debug, Clone, Serialize)]
pub struct ShipReceipt {
    pub feature_id: String,
    pub name: String,
    pub shipped_file: PathBuf,
    pub shipped: NaiveDate,
}

/// Mark a feature completed by writing its `shipped.md`.
///
/// An existing `shipped.md` is never overwritten.
pub fn ship(
    root: &Path,
    cfg: &Config,
    feature_id: &str,
    summary: &str,
    today: NaiveDate,
) -> Result<ShipReceipt> {
    let dir = paths::feature_dir(root, cfg, feature_id);
    if !dir.is_dir() {
        return Err(FeatflowError::FeatureDirNotFound(dir));
    }
    if !dir.join(IDEA_FILE).is_file() {
        return Err(FeatflowError::NotAFeature(feature_id.to_string()));
    }

    let shipped_file = dir.join(SHIPPED_FILE);
    let name = FeatureContext::from_dir(&dir)
        .map(|ctx| ctx.name)
        .unwrap_or_else(|| feature_id.to_string());

    let content = shipped_markdown(&name, summary, today);
    if !crate::io::write_if_missing(&shipped_file, content.as_bytes())? {
        return Err(FeatflowError::AlreadyShipped(shipped_file));
    }
    tracing::debug!(feature = feature_id, path = %shipped_file.display(), "shipped.md written");

    Ok(ShipReceipt {
        feature_id: feature_id.to_string(),
        name,
        shipped_file,
        shipped: today,
    })
}

fn shipped_markdown(name: &str, summary: &str, today: NaiveDate) -> String {
    format!(
        "---\nshipped: {today}\n---\n\n# Shipped: {name}\n\n## Summary\n{summary}\n\n## Notes\nMarked as shipped via featflow.\n"
    )
}
