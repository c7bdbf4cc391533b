use crate::output::print_json;
use anyhow::Context;
use featflow_core::{config::Config, dashboard};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let generated = dashboard::generate(root, &config, super::today())
        .context("failed to generate dashboard")?;

    if json {
        print_json(&generated)?;
    } else {
        let c = generated.counts;
        println!("Dashboard updated: {}", generated.path.display());
        println!(
            "  {} features: {} in progress, {} backlog, {} completed",
            c.total(),
            c.in_progress,
            c.backlog,
            c.completed
        );
    }
    Ok(())
}
