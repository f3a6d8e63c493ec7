//! Configuration file for the `jsonschema-ts` command.
//!
//! Read from `--config <path>`, else `jsonschema-ts.toml` in the working
//! directory when present.
//!
//! Example jsonschema-ts.toml:
//! ```toml
//! [settings]
//! declare_referenced = false
//! use_const_enums = false
//! ```

use anyhow::Context;
use jsonschema_ts::Settings;
use serde::Deserialize;
use std::path::Path;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "jsonschema-ts.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub settings: Settings,
}

impl CliConfig {
    /// Load `explicit` if given (it must exist), else the default file in `dir` if present.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => {
                let path = dir.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
