use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::{Table, Value as TomlValue};

/// Secrets file read from the working directory unless overridden.
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";
/// Environment variable naming an alternative secrets file.
pub const SECRETS_FILE_ENV: &str = "REGLAB_SECRETS_FILE";
/// Name of the access password secret.
pub const PASSWORD_KEY: &str = "password";

/// Location of the secrets file: `$REGLAB_SECRETS_FILE` or `./secrets.toml`.
pub fn secrets_path() -> PathBuf {
    std::env::var(SECRETS_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE))
}

// ---------------------------------------------------------------------------
// Secret sources
// ---------------------------------------------------------------------------

/// One layer of configuration that may hold named secrets.
pub trait SecretSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// App-secrets store backed by a TOML file.
#[derive(Debug, Clone, Default)]
pub struct TomlSecrets {
    table: Table,
}

impl TomlSecrets {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        Ok(Self {
            table: toml::from_str::<Table>(content)?,
        })
    }

    /// Load a secrets file. A missing file is an empty store; a malformed
    /// one is logged and treated as empty.
    pub fn load(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            log::debug!("no secrets file at {}", path.display());
            return Self::default();
        };
        match Self::parse(&content) {
            Ok(secrets) => {
                log::info!("loaded secrets store from {}", path.display());
                secrets
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {e}. Ignoring it.", path.display());
                Self::default()
            }
        }
    }
}

impl SecretSource for TomlSecrets {
    /// Exact key, then upper-cased key, then any key equal ignoring case.
    fn get(&self, key: &str) -> Option<String> {
        let value = self
            .table
            .get(key)
            .or_else(|| self.table.get(&key.to_uppercase()))
            .or_else(|| {
                self.table
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })?;
        match value {
            TomlValue::String(s) => Some(s.clone()),
            TomlValue::Table(_) | TomlValue::Array(_) => None,
            other => Some(other.to_string()),
        }
    }
}

/// Process environment: exact key, then upper-cased key.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn get(&self, key: &str) -> Option<String> {
        [key.to_string(), key.to_uppercase()]
            .into_iter()
            .filter_map(|k| std::env::var(k).ok())
            .find(|v| !v.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Ordered stack of secret sources; the first hit wins.
pub struct SecretResolver {
    sources: Vec<Box<dyn SecretSource>>,
}

impl SecretResolver {
    pub fn new(sources: Vec<Box<dyn SecretSource>>) -> Self {
        Self { sources }
    }

    /// The secrets file first, then the process environment.
    pub fn from_environment() -> Self {
        let path = secrets_path();
        Self::new(vec![Box::new(TomlSecrets::load(&path)), Box::new(EnvSecrets)])
    }

    pub fn resolve(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.get(key))
    }
}

// ---------------------------------------------------------------------------
// Non-secret settings
// ---------------------------------------------------------------------------

/// Application settings with built-in defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    pub sample_path: PathBuf,
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "RegLab Tool Starter".to_string(),
            sample_path: PathBuf::from("sample_data/example.csv"),
            preview_rows: 5,
        }
    }
}

impl AppConfig {
    /// Read the optional `[app]` table of the secrets file, falling back to
    /// defaults for anything missing.
    pub fn load() -> Self {
        let Ok(content) = std::fs::read_to_string(secrets_path()) else {
            return Self::default();
        };
        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Self {
        #[derive(Deserialize, Default)]
        struct SettingsFile {
            #[serde(default)]
            app: AppConfig,
        }
        match toml::from_str::<SettingsFile>(content) {
            Ok(file) => file.app,
            Err(e) => {
                log::warn!("Failed to parse app settings: {e}. Using defaults.");
                Self::default()
            }
        }
    }
}
