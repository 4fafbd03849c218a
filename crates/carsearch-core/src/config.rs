//! Configuration loader and typed settings.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_SERVER__PORT=9000`). Index paths expand
//! `~` and `${VAR}` and resolve against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// Smallest writer budget tantivy accepts.
pub const MIN_WRITER_HEAP_BYTES: usize = 15_000_000;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Ok(Self::from_figment(Self::figment_for_env(&env_name)))
    }

    fn figment_for_env(env_name: &str) -> Figment {
        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like `get`, but absent sections fall back to `T::default()`.
    pub fn get_or_default<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Serialize + Default,
    {
        Figment::from(Serialized::defaults(T::default()))
            .merge(self.figment.focus(key))
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self { Self { host: "127.0.0.1".to_string(), port: 8080 } }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// On-disk location; `None` keeps the index in RAM.
    pub dir: Option<String>,
    pub name: String,
    pub writer_heap_bytes: usize,
}

impl Default for IndexConfig {
    fn default() -> Self { Self { dir: None, name: "practical-java".to_string(), writer_heap_bytes: 50_000_000 } }
}

impl IndexConfig {
    pub fn resolved_dir(&self, base: &Path) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| resolve_with_base(base, d).join(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub batch_size: usize,
    pub save_timeout_secs: u64,
    pub retry: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self { Self { batch_size: 10_000, save_timeout_secs: 60, retry: true } }
}

impl BootstrapConfig {
    pub fn save_timeout(&self) -> Duration { Duration::from_secs(self.save_timeout_secs) }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub server: ServerConfig,
    pub index: IndexConfig,
    pub bootstrap: BootstrapConfig,
}

impl AppSettings {
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let settings = Self {
            server: config.get_or_default("server")?,
            index: config.get_or_default("index")?,
            bootstrap: config.get_or_default("bootstrap")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.server.port == 0 {
            return Err(Error::InvalidConfig("server.port must be non-zero".to_string()));
        }
        if self.bootstrap.batch_size == 0 {
            return Err(Error::InvalidConfig("bootstrap.batch_size must be >= 1".to_string()));
        }
        if self.bootstrap.save_timeout_secs == 0 {
            return Err(Error::InvalidConfig("bootstrap.save_timeout_secs must be >= 1".to_string()));
        }
        if self.index.writer_heap_bytes < MIN_WRITER_HEAP_BYTES {
            return Err(Error::InvalidConfig(format!(
                "index.writer_heap_bytes must be >= {}, got {}",
                MIN_WRITER_HEAP_BYTES, self.index.writer_heap_bytes
            )));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
