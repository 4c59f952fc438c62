//! Configuration types for crowdseq.
//!
//! [`Config::load`] reads `~/.config/crowdseq/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies
//! `CROWDSEQ__<SECTION>__<KEY>` environment overrides. [`Config::defaults`]
//! returns the same defaults without touching the filesystem.

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
bind = "127.0.0.1:8000"

[database]
path = "crowdseq.db"

[pagination]
page_size     = 10
max_page_size = 1000

[import]
default_priority = 50
max_upload_bytes = 26214400
"#;

const ENV_PREFIX: &str = "CROWDSEQ";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:8000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf { PathBuf::from("crowdseq.db") }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

/// `[pagination]` section. Applies to the empty-query search listing and
/// `GET /variants`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

fn default_page_size() -> u64 { 10 }
fn default_max_page_size() -> u64 { 1000 }

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// `[import]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Priority given to imported annotations that carry none.
    #[serde(default = "default_priority")]
    pub default_priority: i64,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_priority() -> i64 { 50 }
fn default_max_upload_bytes() -> usize { 25 * 1024 * 1024 }

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/crowdseq/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent)
                    .and_then(|_| std::fs::write(&path, DEFAULT_CONFIG.trim_start()))
                {
                    tracing::warn!(path = %path.display(), error = %e, "could not write default config");
                }
            }
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file, which must exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        Ok(Self::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(env_source())
            .build()?
            .try_deserialize()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env_source())
            .build()?
            .try_deserialize()?)
    }

    fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        Self::builder()
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("crowdseq")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
