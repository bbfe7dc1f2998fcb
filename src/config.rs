//! Config model and persistence helpers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Top-level configuration stored in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings.
    pub api: ApiCfg,
    /// The submitting operator.
    pub user: UserCfg,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCfg {
    /// Base URL of the job/report backend.
    pub base_url: String,
}

/// Operator identity sent with evidence uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCfg {
    /// Actor role the storage collaborator files uploads under.
    pub role: String,
}

impl Config {
    /// Load from disk or create defaults when missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str(&s)?)
        } else {
            let cfg = Self::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Persist the config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiCfg {
                base_url: "".into(),
            },
            user: UserCfg {
                role: "field_agent".into(),
            },
        }
    }
}
