use clap::Subcommand;
use featflow_core::{
    config::Config,
    dashboard,
    hooks::{self, FeatureFileChange, HookInput, HookVerdict},
};
use std::io::Read;
use std::path::Path;

#[derive(Subcommand)]
pub enum HookEvent {
    /// Block direct writes to the generated dashboard (exit code 2)
    PreToolUse,
    /// Regenerate the dashboard after a feature file is written
    PostToolUse,
}

/// Handle one hook call. Anything unexpected in the input lets the tool
/// call through; only a dashboard write yields `Block`.
pub fn run(root: &Path, event: HookEvent) -> anyhow::Result<HookVerdict> {
    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        tracing::debug!("ignoring unreadable hook input: {e}");
        return Ok(HookVerdict::Allow);
    }

    let input = match HookInput::parse(&raw) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!("ignoring unparseable hook input: {e}");
            return Ok(HookVerdict::Allow);
        }
    };

    let config = Config::load(root).unwrap_or_else(|e| {
        tracing::warn!("invalid config, using defaults: {e}");
        Config::default()
    });

    match event {
        HookEvent::PreToolUse => {
            let verdict = hooks::pre_tool_use(&input, &config);
            if verdict == HookVerdict::Block {
                eprint!("{}", hooks::blocked_message(&config));
            }
            Ok(verdict)
        }
        HookEvent::PostToolUse => {
            if let Some(change) = hooks::post_tool_use(&input, &config) {
                regenerate(root, &config, &change);
            }
            Ok(HookVerdict::Allow)
        }
    }
}

fn regenerate(root: &Path, config: &Config, change: &FeatureFileChange) {
    let project_root = change.project_root.as_deref().unwrap_or(root);
    eprintln!(
        "[hook] Detected feature file write: {}/{}",
        change.feature_id, change.kind
    );
    eprintln!("[hook] Regenerating {}", config.dashboard);

    if let Err(e) = dashboard::generate(project_root, config, super::today()) {
        tracing::warn!("dashboard regeneration failed: {e}");
    }
}
