use crate::config::Config;
use crate::context::FeatureContext;
use crate::error::Result;
use crate::features::{self, StatusCounts};
use crate::paths;
use crate::status::FeatureStatus;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// generate()
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    pub path: PathBuf,
    pub counts: StatusCounts,
}

/// Scan the feature tree and rewrite the dashboard file.
pub fn generate(root: &Path, cfg: &Config, today: NaiveDate) -> Result<Generated> {
    let features = features::scan(&paths::features_dir(root, cfg))?;
    let content = render(&features, &cfg.features_dir_str(), today);
    let path = paths::dashboard_path(root, cfg);
    crate::io::atomic_write(&path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), features = features.len(), "dashboard written");
    Ok(Generated {
        path,
        counts: StatusCounts::of(&features),
    })
}

// ---------------------------------------------------------------------------
// render()
// ---------------------------------------------------------------------------

/// Render the dashboard markdown for `features`.
///
/// Pure: the same features and date always produce the same text.
pub fn render(features: &[FeatureContext], features_dir: &str, today: NaiveDate) -> String {
    let all = features::index(features);
    let counts = StatusCounts::of(features);
    let mut out = String::new();

    out.push_str("# Feature Dashboard\n\n");
    out.push_str(&format!(
        "> Auto-generated from `{features_dir}/`. Do not edit this file directly.\n"
    ));
    out.push_str(
        "> Backlog: write `<id>/idea.md` | Start: write `<id>/plan.md` | Ship: write `<id>/shipped.md`\n\n",
    );
    out.push_str(&format!("_Last updated: {today}_\n\n"));

    out.push_str("## Summary\n\n");
    out.push_str("| Status | Count |\n|--------|-------|\n");
    for status in section_order() {
        out.push_str(&format!("| {} | {} |\n", status.label(), counts.get(status)));
    }
    out.push_str(&format!("| **Total** | {} |\n\n", counts.total()));

    for status in section_order() {
        let mut rows: Vec<&FeatureContext> =
            features.iter().filter(|f| f.status == status).collect();
        rows.sort_by(|a, b| compare_within(status, a, b));

        out.push_str(&format!("## {}\n\n", status.label()));
        if rows.is_empty() {
            out.push_str("_None._\n\n");
            continue;
        }
        out.push_str(&table(status, &rows, &all));
        out.push('\n');
    }

    out
}

fn section_order() -> [FeatureStatus; 3] {
    [
        FeatureStatus::InProgress,
        FeatureStatus::Backlog,
        FeatureStatus::Completed,
    ]
}

fn table(
    status: FeatureStatus,
    rows: &[&FeatureContext],
    all: &HashMap<String, FeatureContext>,
) -> String {
    let headers: &[&str] = match status {
        FeatureStatus::InProgress => &[
            "ID", "Name", "Type", "Priority", "Started", "Waiting On", "Blocked By",
        ],
        FeatureStatus::Backlog => &[
            "ID", "Name", "Type", "Priority", "Effort", "Impact", "Created", "Waiting On",
            "Blocked By",
        ],
        FeatureStatus::Completed => &["ID", "Name", "Type", "Shipped"],
    };

    let mut out = format!("| {} |\n", headers.join(" | "));
    let sep: Vec<String> = headers.iter().map(|h| "-".repeat(h.len() + 2)).collect();
    out.push_str(&format!("|{}|\n", sep.join("|")));

    for f in rows {
        let link = link(&f.id);
        let cells: Vec<String> = match status {
            FeatureStatus::InProgress => vec![
                link,
                cell(&f.name),
                cell(&f.kind),
                cell(&f.priority),
                date_cell(f.started),
                list_cell(&f.unmet_dependencies(all)),
                list_cell(&f.blocked_by),
            ],
            FeatureStatus::Backlog => vec![
                link,
                cell(&f.name),
                cell(&f.kind),
                cell(&f.priority),
                cell(&f.effort),
                cell(&f.impact),
                date_cell(f.created),
                list_cell(&f.unmet_dependencies(all)),
                list_cell(&f.blocked_by),
            ],
            FeatureStatus::Completed => vec![
                link,
                cell(&f.name),
                cell(&f.kind),
                date_cell(f.shipped),
            ],
        };
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// Relative link to the feature directory; the label is escaped for the
/// table and the target is percent-encoded.
fn link(id: &str) -> String {
    let target = id
        .replace('%', "%25")
        .replace(' ', "%20")
        .replace('|', "%7C");
    format!("[{}]({target}/)", id.replace('|', "\\|"))
}

fn cell(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.replace('|', "\\|")
    }
}

fn date_cell(value: Option<NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn list_cell(items: &[String]) -> String {
    cell(&items.join(", "))
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// `P0` ranks before `P1`; anything else sorts last.
fn priority_rank(priority: &str) -> u32 {
    priority
        .trim()
        .strip_prefix(['P', 'p'])
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

/// `None` dates sort after all real dates.
fn cmp_date_asc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_within(status: FeatureStatus, a: &FeatureContext, b: &FeatureContext) -> Ordering {
    let primary = match status {
        FeatureStatus::InProgress => cmp_date_asc(a.started, b.started),
        FeatureStatus::Backlog => priority_rank(&a.priority)
            .cmp(&priority_rank(&b.priority))
            .then_with(|| cmp_date_asc(a.created, b.created)),
        // Most recent first.
        FeatureStatus::Completed => match (a.shipped, b.shipped) {
            (Some(x), Some(y)) => y.cmp(&x),
            (x, y) => cmp_date_asc(x, y),
        },
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
