//! Agent directory resolution.
//!
//! Precedence:
//! 1. `LADLE_AGENT_DIR`, used as-is
//! 2. `LADLE_STATE_DIR/agents/main/agent`
//! 3. `~/.ladle/agents/main/agent`
//!
//! Overrides may start with `~`, which expands to the home directory.

use std::path::{Path, PathBuf};

use crate::models::ModelsConfigError;

/// Overrides the agent directory outright.
pub const AGENT_DIR_ENV: &str = "LADLE_AGENT_DIR";
/// Overrides the state root the agent directory lives under.
pub const STATE_DIR_ENV: &str = "LADLE_STATE_DIR";

const STATE_DIR_NAME: &str = ".ladle";
const DEFAULT_AGENT_ID: &str = "main";

/// Resolve the agent directory from the process environment.
pub fn resolve_agent_dir() -> Result<PathBuf, ModelsConfigError> {
    let dir = agent_dir_from_env(|var| std::env::var(var).ok(), dirs::home_dir())?;
    tracing::debug!(agent_dir = %dir.display(), "Resolved agent directory");
    Ok(dir)
}

/// Resolve the agent directory with injected lookups.
pub fn agent_dir_from_env<F>(get_env: F, home: Option<PathBuf>) -> Result<PathBuf, ModelsConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = non_blank(&get_env, AGENT_DIR_ENV) {
        return Ok(expand_home(&dir, home.as_deref()));
    }

    let state_dir = match non_blank(&get_env, STATE_DIR_ENV) {
        Some(dir) => expand_home(&dir, home.as_deref()),
        None => home
            .ok_or(ModelsConfigError::HomeDirNotFound)?
            .join(STATE_DIR_NAME),
    };

    Ok(state_dir
        .join("agents")
        .join(DEFAULT_AGENT_ID)
        .join("agent"))
}

fn non_blank<F>(get_env: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get_env(var).filter(|value| !value.trim().is_empty())
}

fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    let expanded =
        shellexpand::tilde_with_context(raw, || home.map(|h| h.to_string_lossy().into_owned()));
    PathBuf::from(expanded.as_ref())
}
