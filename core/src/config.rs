use serde_derive::{Deserialize, Serialize};

use crate::transaction::IsolationLevel;

/// Database-wide configuration. `default_isolation` is the only documented
/// setting (`spec.md` §6): it's applied to every `Begin` issued after it's
/// set, and has no effect on transactions already in progress.
///
/// Modeled on the teacher's `kv-cli::server::config::ConfigLoad`, trimmed
/// to the single field this engine actually exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_isolation: IsolationLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config { default_isolation: IsolationLevel::default() }
    }
}
