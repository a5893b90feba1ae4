//! Configuration management for Huskier
//!
//! Hook commands live under the `huskier` key of the project's `package.json`:
//!
//! ```json
//! {
//!   "huskier": {
//!     "parallel": false,
//!     "hooks": {
//!       "pre-commit": ["npm run lint", ["npm run build", "npm test"]]
//!     }
//!   }
//! }
//! ```
//!
//! An entry is either a single command or an array of commands that must run
//! one after another. A standalone `huskier.toml` with the same shape is merged
//! over `package.json`, and `HUSKIER_*` environment variables win over both.

mod core;

pub use self::core::{ConfigSource, PACKAGE_JSON, TOML_CONFIG, ensure_package_key};

use crate::execution::CommandSpec;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the hook run by `huskier run --staged`
pub const PRE_COMMIT: &str = "pre-commit";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuskierConfig {
    /// Command lists keyed by git hook name
    pub hooks: BTreeMap<String, Vec<CommandSpec>>,

    /// Run top-level entries concurrently instead of one at a time
    #[serde(default)]
    pub parallel: bool,

    /// Shell used to interpret each command
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_shell() -> String {
    "sh".to_string()
}

impl Default for HuskierConfig {
    fn default() -> Self {
        let mut hooks = BTreeMap::new();
        hooks.insert(PRE_COMMIT.to_string(), Vec::new());

        Self {
            hooks,
            parallel: false,
            shell: default_shell(),
        }
    }
}

impl HuskierConfig {
    /// Command list for a hook
    pub fn hook(&self, name: &str) -> Result<&[CommandSpec]> {
        match self.hooks.get(name) {
            Some(specs) => Ok(specs),
            None => anyhow::bail!("huskier.hooks.{name} is missing from package.json"),
        }
    }

    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }
}
