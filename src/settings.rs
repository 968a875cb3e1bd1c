use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::loader::{default_file_names, ColumnMap, Fallback, LoadOptions, SourceDescriptor};
use crate::nearby::{NearbyStrategy, DEFAULT_LIMIT};

/// Optional settings file, looked up without extension (`directory.toml`, ...).
pub const CONFIG_FILE: &str = "directory";
pub const ENV_PREFIX: &str = "DIRECTORY";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Load exactly this file instead of searching.
    pub data_path: Option<PathBuf>,
    pub search_dirs: Vec<PathBuf>,
    /// Candidate file names in priority order.
    pub file_names: Vec<String>,
    pub fallback: Fallback,
    pub columns: ColumnMap,
    pub nearby: NearbySettings,
    pub server: ServerSettings,
    pub popular_cities: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NearbySettings {
    pub strategy: NearbyStrategy,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    /// Tried in order; the first free one is used.
    pub ports: Vec<u16>,
    /// Absolute site URL for sitemap entries. Derived from the request when unset.
    pub base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_path: None,
            search_dirs: vec![PathBuf::from("data"), PathBuf::from("."), PathBuf::from("..")],
            file_names: default_file_names(),
            fallback: Fallback::default(),
            columns: ColumnMap::default(),
            nearby: NearbySettings::default(),
            server: ServerSettings::default(),
            popular_cities: 12,
        }
    }
}

impl Default for NearbySettings {
    fn default() -> Self {
        NearbySettings {
            strategy: NearbyStrategy::default(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            ports: vec![5000, 8080, 3000],
            base_url: None,
        }
    }
}

impl Settings {
    /// Defaults, then `directory.{toml,json,yaml}` if present, then
    /// `DIRECTORY_*` environment variables (`__` separates nested keys).
    pub fn load() -> Result<Settings> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("search_dirs")
                    .with_list_parse_key("file_names")
                    .with_list_parse_key("server.ports")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn source(&self) -> SourceDescriptor {
        match &self.data_path {
            Some(path) => SourceDescriptor::Path(path.clone()),
            None => SourceDescriptor::Discover {
                dirs: self.search_dirs.clone(),
                file_names: self.file_names.clone(),
            },
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            columns: self.columns.clone(),
            fallback: self.fallback,
        }
    }
}
