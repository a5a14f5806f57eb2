//! Fetch configuration
//!
//! Settings live in a TOML document keyed by dotted paths. The ones read by the
//! fetch pipeline are:
//!
//! - `cloud.region`, `cloud.profile`
//! - `cloud.<service>.sync` enables or disables a whole service
//! - `cloud.<service>.<type>.sync` enables or disables one resource type
//!
//! Every sync toggle defaults to `true` when absent.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const REGION_KEY: &str = "cloud.region";
pub const PROFILE_KEY: &str = "cloud.profile";

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: toml::Table,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `config.toml` under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "", "awsgraph").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let values: toml::Table = toml::from_str(content).context("invalid configuration")?;
        Ok(Config { values })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in config file {}", path.display()))
    }

    /// Loads the file at [`Config::default_path`], or an empty config when it is absent.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.values)?;
        std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        let mut parts = key.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = current.as_table()?.get(part)?;
        }
        Some(current)
    }

    /// Sets a dotted key. `true`/`false` and integers are stored typed, anything else as a string.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            bail!("invalid config key '{}'", key);
        }
        let Some((last, parents)) = parts.split_last() else {
            bail!("invalid config key '{}'", key);
        };

        let mut table = &mut self.values;
        for part in parents {
            let entry = table
                .entry(part.to_string())
                .or_insert(toml::Value::Table(toml::Table::new()));
            table = match entry {
                toml::Value::Table(inner) => inner,
                _ => bail!("config key '{}' is not a table", part),
            };
        }
        table.insert(last.to_string(), parse_value(value));
        Ok(())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            toml::Value::Boolean(b) => Some(*b),
            toml::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn region(&self) -> &str {
        self.get_str(REGION_KEY).unwrap_or(DEFAULT_REGION)
    }

    pub fn profile(&self) -> &str {
        self.get_str(PROFILE_KEY).unwrap_or(DEFAULT_PROFILE)
    }

    pub fn service_sync(&self, service: &str) -> bool {
        self.get_bool(&format!("cloud.{}.sync", service)).unwrap_or(true)
    }

    pub fn type_sync(&self, service: &str, kind: &str) -> bool {
        self.get_bool(&format!("cloud.{}.{}.sync", service, kind))
            .unwrap_or(true)
    }
}

fn parse_value(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    toml::Value::String(raw.to_string())
}
