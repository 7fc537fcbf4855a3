use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::{env, fs::read_to_string, path::Path};
use tracing::Level;

use crate::{
    cli::InvokeCmdOpts,
    error::{Error, Result},
};

pub const DISTRIBUTION_ID_VAR: &str = "DISTRIBUTION_ID";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const JSON_LOG_VAR: &str = "JSON_LOG";

pub fn load_config(path: &Path) -> anyhow::Result<InvalidatorConfig> {
    if !path.exists() {
        bail!("Could not find config file {path:?}")
    }
    let toml = read_to_string(path)?;
    toml::from_str(&toml).context("Failed to deserialize")
}

/// Runtime configuration of the invalidator.
///
/// Loaded once at process start. The distribution id is required; the handler
/// refuses to run with an empty one.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InvalidatorConfig {
    /// CloudFront distribution to invalidate.
    #[serde(default)]
    pub distribution_id: String,
    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON log lines. Unset means "pick per command".
    #[serde(default)]
    pub json_log: Option<bool>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for InvalidatorConfig {
    fn default() -> Self {
        Self {
            distribution_id: String::new(),
            log_level: default_log_level(),
            json_log: None,
        }
    }
}

impl InvalidatorConfig {
    pub fn new(distribution_id: impl Into<String>) -> Self {
        Self {
            distribution_id: distribution_id.into(),
            ..Default::default()
        }
    }

    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.merge_vars(env::vars())?;
        Ok(config)
    }

    /// Overlay the recognized variables found in `vars`.
    pub fn merge_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            match key.as_ref() {
                DISTRIBUTION_ID_VAR => self.distribution_id = value.into(),
                LOG_LEVEL_VAR => self.log_level = value.into(),
                JSON_LOG_VAR => {
                    let value: String = value.into();
                    self.json_log = Some(parse_bool(JSON_LOG_VAR, &value)?);
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn merge_log_level(&mut self, log_level: Option<Level>) {
        if let Some(log_level) = log_level {
            self.log_level = log_level.to_string().to_lowercase();
        }
    }

    pub fn merge_invoke_opts(&mut self, opts: &InvokeCmdOpts) {
        if let Some(distribution_id) = &opts.distribution_id {
            self.distribution_id = distribution_id.clone();
        }
        if let Some(json_log) = opts.json_log {
            self.json_log = Some(json_log);
        }
    }

    /// A missing distribution id is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.distribution_id.trim().is_empty() {
            return Err(Error::Config(format!("{DISTRIBUTION_ID_VAR} is not set")));
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(Error::Config(format!("{name} must be a boolean, got `{other}`"))),
    }
}
