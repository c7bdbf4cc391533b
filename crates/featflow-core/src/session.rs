//! Per-session "current feature" marker read by the terminal statusline.
//!
//! The filesystem layout is `<sessions_dir>/<session>.feature`, one feature
//! id per file. Everything goes through [`SessionStore`] so callers can swap
//! in [`MemorySessionStore`] for tests.

use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const FEATURE_EXT: &str = "feature";

pub trait SessionStore {
    fn get(&self, session: &str) -> Result<Option<String>>;
    fn set(&mut self, session: &str, feature_id: &str) -> Result<()>;
    /// Remove the marker, returning the feature id it held.
    fn clear(&mut self, session: &str) -> Result<Option<String>>;
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn feature_file(&self, session: &str) -> PathBuf {
        self.dir.join(format!("{session}.{FEATURE_EXT}"))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, session: &str) -> Result<Option<String>> {
        let path = self.feature_file(session);
        if !path.exists() {
            return Ok(None);
        }
        let id = std::fs::read_to_string(&path)?.trim().to_string();
        Ok(if id.is_empty() { None } else { Some(id) })
    }

    fn set(&mut self, session: &str, feature_id: &str) -> Result<()> {
        crate::io::atomic_write(&self.feature_file(session), feature_id.as_bytes())
    }

    fn clear(&mut self, session: &str) -> Result<Option<String>> {
        let path = self.feature_file(session);
        if !path.exists() {
            return Ok(None);
        }
        let id = std::fs::read_to_string(&path)?.trim().to_string();
        std::fs::remove_file(&path)?;
        Ok(Some(id))
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session: &str) -> Result<Option<String>> {
        Ok(self.entries.get(session).cloned())
    }

    fn set(&mut self, session: &str, feature_id: &str) -> Result<()> {
        self.entries
            .insert(session.to_string(), feature_id.to_string());
        Ok(())
    }

    fn clear(&mut self, session: &str) -> Result<Option<String>> {
        Ok(self.entries.remove(session))
    }
}

// ---------------------------------------------------------------------------
// Session id resolution
// ---------------------------------------------------------------------------

/// Work out the session key.
///
/// `SESSION_ID` wins when non-empty. Otherwise an iTerm session id is mapped
/// through `<sessions_dir>/iterm-<id>.session`, written by the shell
/// integration.
pub fn resolve_session_id(
    session_env: Option<&str>,
    iterm_env: Option<&str>,
    sessions_dir: &Path,
) -> Option<String> {
    if let Some(id) = session_env.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(id.to_string());
    }

    let iterm = iterm_env.map(str::trim).filter(|s| !s.is_empty())?;
    let mapping = sessions_dir.join(format!("iterm-{iterm}.session"));
    let mapped = std::fs::read_to_string(mapping).ok()?;
    let mapped = mapped.trim();
    if mapped.is_empty() {
        None
    } else {
        Some(mapped.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
