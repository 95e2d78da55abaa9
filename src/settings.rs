use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::recert::RecertPolicy;
use crate::reconcile::DuplicatePolicy;

pub const DEFAULT_CONFIG_FILE: &str = "adr-governance.toml";
pub const ENV_PREFIX: &str = "ADR_GOV";
pub const DEFAULT_BLANK_MARKER: &str = "Check with CPA team";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Months added to the approval date to get the recertification due date.
    pub offset_months: u32,
    /// How far ahead a due date counts as upcoming.
    pub window_months: u32,
    pub duplicate_policy: DuplicatePolicy,
    /// Written into every empty output cell.
    pub blank_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        let policy = RecertPolicy::default();
        Settings {
            offset_months: policy.offset_months,
            window_months: policy.window_months,
            duplicate_policy: DuplicatePolicy::default(),
            blank_marker: DEFAULT_BLANK_MARKER.to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then `ADR_GOV_*` environment variables.
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                if !p.exists() {
                    bail!("config file not found: {}", p.display());
                }
                builder = builder.add_source(File::from(p));
            }
            None => {
                let default_file = File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false);
                builder = builder.add_source(default_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    pub fn recert_policy(&self) -> RecertPolicy {
        RecertPolicy {
            offset_months: self.offset_months,
            window_months: self.window_months,
        }
    }
}
