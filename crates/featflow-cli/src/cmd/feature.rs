use crate::output::{date_or_dash, list_or_dash, print_json, print_table, text_or_dash};
use anyhow::Context;
use featflow_core::{config::Config, features, paths, FeatflowError, FeatureContext, FeatureStatus};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// A feature plus the dependencies still holding it up.
#[derive(Serialize)]
struct FeatureView<'a> {
    #[serde(flatten)]
    feature: &'a FeatureContext,
    unmet_dependencies: Vec<String>,
}

pub fn list(root: &Path, status: Option<&str>, json: bool) -> anyhow::Result<()> {
    let filter = status
        .map(FeatureStatus::from_str)
        .transpose()
        .context("invalid --status")?;

    let config = Config::load(root).context("failed to load config")?;
    let all = features::scan(&paths::features_dir(root, &config))
        .context("failed to scan features")?;
    let by_id = features::index(&all);

    let views: Vec<FeatureView> = all
        .iter()
        .filter(|f| filter.map(|s| f.status == s).unwrap_or(true))
        .map(|f| FeatureView {
            feature: f,
            unmet_dependencies: f.unmet_dependencies(&by_id),
        })
        .collect();

    if json {
        print_json(&views)?;
        return Ok(());
    }

    if views.is_empty() {
        println!("No features yet. Add one with {}/<id>/idea.md", config.features_dir_str());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = views
        .iter()
        .map(|v| {
            vec![
                v.feature.id.clone(),
                v.feature.status.to_string(),
                text_or_dash(&v.feature.priority),
                list_or_dash(&v.unmet_dependencies),
                v.feature.name.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "STATUS", "PRIORITY", "WAITING ON", "NAME"], rows);
    Ok(())
}

pub fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let feature = FeatureContext::from_dir(&paths::feature_dir(root, &config, id))
        .ok_or_else(|| FeatflowError::FeatureNotFound(id.to_string()))?;

    let all = features::scan(&paths::features_dir(root, &config))
        .context("failed to scan features")?;
    let unmet = feature.unmet_dependencies(&features::index(&all));

    if json {
        print_json(&FeatureView {
            feature: &feature,
            unmet_dependencies: unmet,
        })?;
        return Ok(());
    }

    println!("Feature:  {} ({})", feature.id, feature.name);
    println!("Status:   {}", feature.status);
    for (label, value) in [
        ("Type", &feature.kind),
        ("Priority", &feature.priority),
        ("Effort", &feature.effort),
        ("Impact", &feature.impact),
    ] {
        if !value.is_empty() {
            println!("{:<9} {value}", format!("{label}:"));
        }
    }
    println!("Created:  {}", date_or_dash(feature.created));
    println!("Started:  {}", date_or_dash(feature.started));
    println!("Shipped:  {}", date_or_dash(feature.shipped));

    if !feature.depends_on.is_empty() {
        println!("\nDepends on: {}", feature.depends_on.join(", "));
        if unmet.is_empty() {
            println!("  all dependencies completed");
        } else {
            println!("  waiting on: {}", unmet.join(", "));
        }
    }
    if feature.is_blocked() {
        println!("\nBlocked by:");
        for b in &feature.blocked_by {
            println!("  - {b}");
        }
    }
    Ok(())
}
