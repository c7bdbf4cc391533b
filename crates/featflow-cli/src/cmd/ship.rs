use crate::cmd::statusline::CurrentSession;
use crate::output::print_json;
use anyhow::Context;
use featflow_core::{config::Config, dashboard, ship};
use std::path::Path;

pub fn run(root: &Path, id: &str, summary: Option<String>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let today = super::today();
    let summary = summary.unwrap_or_else(|| ship::DEFAULT_SUMMARY.to_string());

    let receipt = ship::ship(root, &config, id, &summary, today)
        .with_context(|| format!("failed to ship '{id}'"))?;

    // The feature is shipped at this point; the follow-ups only warn.
    let cleared = match CurrentSession::open(&config).and_then(|mut s| s.clear()) {
        Ok(cleared) => cleared,
        Err(e) => {
            tracing::warn!("could not clear statusline: {e:#}");
            None
        }
    };
    let dashboard = match dashboard::generate(root, &config, today) {
        Ok(generated) => Some(generated.path),
        Err(e) => {
            tracing::warn!("dashboard regeneration failed: {e}");
            None
        }
    };

    if json {
        return print_json(&serde_json::json!({
            "shipped": receipt,
            "statusline_cleared": cleared,
            "dashboard": dashboard,
        }));
    }

    println!("Created: {}", receipt.shipped_file.display());
    if let Some(cleared) = cleared {
        println!("Statusline cleared: {cleared}");
    }
    if let Some(path) = dashboard {
        println!("Dashboard updated: {}", path.display());
    }
    println!("Feature shipped: {}", receipt.feature_id);
    println!();
    println!("Next steps:");
    println!(
        "  1. Review {} and add more details if needed",
        receipt.shipped_file.display()
    );
    println!(
        "  2. Commit the changes: git add {}/ && git commit -m \"Ship: {}\"",
        config.features_dir_str(),
        receipt.name
    );
    Ok(())
}
