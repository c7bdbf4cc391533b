use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use featflow_core::{
    config::Config,
    paths,
    session::{resolve_session_id, FileSessionStore, SessionStore},
    FeatflowError, FeatureContext,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum StatuslineSubcommand {
    /// Show <feature-id> in the statusline for this session
    Set { feature_id: String },
    /// Remove the feature from the statusline for this session
    Clear,
    /// Print the feature currently shown for this session
    Get,
}

/// The file store plus the session it is keyed by, if one could be found.
pub struct CurrentSession {
    pub store: FileSessionStore,
    pub session: Option<String>,
}

impl CurrentSession {
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let dir = paths::sessions_dir(config).ok_or(FeatflowError::HomeNotFound)?;
        let session = resolve_session_id(
            std::env::var("SESSION_ID").ok().as_deref(),
            std::env::var("ITERM_SESSION_ID").ok().as_deref(),
            &dir,
        );
        Ok(Self {
            store: FileSessionStore::new(dir),
            session,
        })
    }

    /// Clear this session's marker. `None` when there was nothing to clear
    /// or no session could be determined.
    pub fn clear(&mut self) -> anyhow::Result<Option<String>> {
        let Some(session) = self.session.as_deref() else {
            tracing::warn!("could not determine session id (set SESSION_ID)");
            return Ok(None);
        };
        Ok(self
            .store
            .clear(session)
            .context("failed to clear statusline")?)
    }
}

pub fn run(root: &Path, subcmd: StatuslineSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut current = CurrentSession::open(&config)?;

    match subcmd {
        StatuslineSubcommand::Set { feature_id } => set(root, &config, &mut current, &feature_id, json),
        StatuslineSubcommand::Clear => clear(&mut current, json),
        StatuslineSubcommand::Get => get(&current, json),
    }
}

fn set(
    root: &Path,
    config: &Config,
    current: &mut CurrentSession,
    feature_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let Some(session) = current.session.clone() else {
        tracing::warn!("could not determine session id (set SESSION_ID)");
        if json {
            print_json(&serde_json::json!({ "set": false }))?;
        }
        return Ok(());
    };

    if FeatureContext::from_dir(&paths::feature_dir(root, config, feature_id)).is_none() {
        tracing::warn!(feature = feature_id, "no idea.md found for this feature");
    }

    current
        .store
        .set(&session, feature_id)
        .context("failed to write statusline")?;

    if json {
        print_json(&serde_json::json!({ "set": true, "session": session, "feature": feature_id }))
    } else {
        println!("Feature context set: {feature_id}");
        Ok(())
    }
}

fn clear(current: &mut CurrentSession, json: bool) -> anyhow::Result<()> {
    let cleared = current.clear()?;
    if json {
        return print_json(&serde_json::json!({ "cleared": cleared }));
    }
    match cleared {
        Some(id) => println!("Feature context cleared: {id}"),
        None => println!("No feature context to clear"),
    }
    Ok(())
}

fn get(current: &CurrentSession, json: bool) -> anyhow::Result<()> {
    let feature = match current.session.as_deref() {
        Some(session) => current.store.get(session).context("failed to read statusline")?,
        None => None,
    };
    if json {
        return print_json(&serde_json::json!({ "feature": feature }));
    }
    if let Some(id) = feature {
        println!("{id}");
    }
    Ok(())
}
