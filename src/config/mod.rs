//! Configuration management.

mod agent_dir;

pub use agent_dir::{agent_dir_from_env, resolve_agent_dir, AGENT_DIR_ENV, STATE_DIR_ENV};
